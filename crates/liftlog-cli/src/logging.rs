//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout stays usable for JSON and plain output.
//! `RUST_LOG` takes precedence over the `-v` count.

use std::io::Write;

use log::LevelFilter;

/// Level for a `-v` count. Quiet mode only lets errors through.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_logger(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    let mut builder = env_logger::Builder::new();
    builder
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .filter_level(level);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    let _ = builder.try_init();
}
