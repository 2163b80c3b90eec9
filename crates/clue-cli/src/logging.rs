use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

/// Parses a level name, accepting `warning` as an alias for `warn`.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let level = parse_level(level).ok_or_else(|| anyhow!("unknown log level '{level}'"))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr);

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    if json {
        let _ = tracing::subscriber::set_global_default(
            builder.json().with_current_span(false).finish(),
        );
    } else {
        let _ = tracing::subscriber::set_global_default(builder.with_target(true).finish());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{init_logging, parse_level};
    use tracing::Level;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("warning"), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(init_logging("loud", false).is_err());
    }
}
