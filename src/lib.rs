#![recursion_limit = "256"]

//! Character-level password strength classifier: a small
//! encoder/decoder transformer trained with Burn on labelled
//! password corpora, and a CLI that rates a single password.

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;

use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset or blank.
pub const DEFAULT_LOG_DIRECTIVE: &str = "pwstrength=info";

/// Filter built from the `RUST_LOG` value, or the default when there is none.
pub fn log_filter(env: Option<&str>) -> anyhow::Result<EnvFilter> {
    let directives = env
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_LOG_DIRECTIVE);
    Ok(EnvFilter::try_new(directives)?)
}

/// Install the tracing subscriber shared by both binaries.
///
/// `RUST_LOG` replaces the default of `pwstrength=info` entirely.
pub fn init_tracing() -> anyhow::Result<()> {
    let env    = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(env.as_deref())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_overrides_default_filter() {
        let filter = log_filter(Some("pwstrength=debug")).unwrap().to_string();
        assert!(filter.contains("pwstrength=debug"), "{filter}");
        assert!(!filter.contains("pwstrength=info"), "{filter}");
    }

    #[test]
    fn test_default_filter_without_rust_log() {
        for env in [None, Some(""), Some("  ")] {
            let filter = log_filter(env).unwrap().to_string();
            assert!(filter.contains(DEFAULT_LOG_DIRECTIVE), "{filter}");
        }
    }

    #[test]
    fn test_malformed_rust_log_is_an_error() {
        assert!(log_filter(Some("pwstrength=loudest")).is_err());
    }
}
