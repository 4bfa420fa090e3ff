use colored::*;
use env_logger::{Builder, Env};
use std::io::Write;

/// Initializes the process-wide logger with a custom format and colors.
///
/// `RUST_LOG` still takes precedence over the default filter.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp().to_string();
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red(),
                log::Level::Warn => record.level().to_string().yellow(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().white(),
            };
            writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
        })
        .init();
}
