use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LogLevel;

/// Filter directive for our own crates at `level`; other crates stay at warn.
pub fn directive(level: LogLevel) -> String {
    format!("warn,apptools={0},apptools_push={0}", level.as_str())
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init(level: LogLevel, verbose: u8) {
    let level = level.raised(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(level)));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_both_crates() {
        assert_eq!(directive(LogLevel::Debug), "warn,apptools=debug,apptools_push=debug");
    }
}
