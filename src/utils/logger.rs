use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Maps a `GALILEO_LOG_LEVEL` value onto a tracing filter directive.
pub fn level_directive(level: &str) -> Option<&'static str> {
    match level.to_ascii_uppercase().as_str() {
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARNING" | "WARN" => Some("warn"),
        "ERROR" | "CRITICAL" => Some("error"),
        _ => None,
    }
}

fn build_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if let Some(directive) = log_level.and_then(level_directive) {
            return EnvFilter::new(format!("galileo_client={}", directive));
        }
        if verbose {
            EnvFilter::new("galileo_client=debug,info")
        } else {
            EnvFilter::new("galileo_client=info")
        }
    })
}

pub fn init_cli_logger(verbose: bool, log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(false, log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive_mapping() {
        assert_eq!(level_directive("WARNING"), Some("warn"));
        assert_eq!(level_directive("critical"), Some("error"));
        assert_eq!(level_directive("debug"), Some("debug"));
        assert_eq!(level_directive("verbose"), None);
    }
}
