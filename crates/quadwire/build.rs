use std::process::Command;

fn main() {
    for (var, exported) in [
        ("TARGET", "QUADWIRE_BUILD_TARGET"),
        ("PROFILE", "QUADWIRE_BUILD_PROFILE"),
    ] {
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={exported}={value}");
        }
        println!("cargo:rerun-if-env-changed={var}");
    }

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok());
    if let Some(version) = version {
        println!("cargo:rustc-env=QUADWIRE_RUSTC_VERSION={}", version.trim());
    }
}
