use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

/// Initialize logging for the process.
///
/// `RUST_LOG` wins over the configured level; an unusable configured level
/// falls back to `info`. Output goes to stderr so command output stays clean.
pub fn init_logging(configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Check that `directive` is a usable filter before it is stored.
pub fn validate_filter(directive: &str) -> Result<()> {
    EnvFilter::try_new(directive)
        .map(|_| ())
        .with_context(|| format!("Invalid log level '{directive}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        assert!(validate_filter("debug").is_ok());
        assert!(validate_filter("owm_core=trace,warn").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        let err = validate_filter("owm_core=notalevel").unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }
}
