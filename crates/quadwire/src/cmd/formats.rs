use quadwire::format::{with_registry, Format};

use crate::cmd::FormatsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_formats, OutputFormat};

pub fn run(args: FormatsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut formats: Vec<Format> = with_registry(|registry| {
        registry
            .formats()
            .iter()
            .filter(|f| !args.readable || f.can_read())
            .filter(|f| !args.writable || f.can_write())
            .cloned()
            .collect()
    });
    formats.sort_by(|a, b| a.name.cmp(&b.name));

    print_formats(&formats, format);
    Ok(SUCCESS)
}
