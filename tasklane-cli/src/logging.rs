use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Map the global flags to a log level; quiet wins, then debug, then verbose
pub fn log_level(verbose: bool, debug: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::WARN
    }
}

/// Install the stderr subscriber. Call once, before any command runs.
pub fn configure_logging(verbose: bool, debug: bool, quiet: bool) {
    let level = log_level(verbose, debug, quiet);
    registry()
        .with(EnvFilter::new(format!("hyper=warn,reqwest=warn,{level}")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_precedence() {
        assert_eq!(log_level(false, false, false), Level::WARN);
        assert_eq!(log_level(true, false, false), Level::TRACE);
        assert_eq!(log_level(true, true, false), Level::DEBUG);
        assert_eq!(log_level(true, true, true), Level::ERROR);
    }
}
