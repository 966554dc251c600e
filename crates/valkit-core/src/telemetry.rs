//! Tracing setup for the `valkit` binary.
//!
//! Log lines go to stderr; stdout carries panel output and fixed commit
//! messages, so it must stay parseable. The verbosity flag applies to the
//! valkit crates only. HTTP and TLS dependencies stay at `warn` so
//! `--verbose` shows flow events rather than connection chatter.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    format!("warn,valkit_core={level},valkit={level}")
}

/// Install the global subscriber. `json` selects newline-delimited JSON
/// lines. Later calls are ignored.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_level_to_valkit() {
        assert_eq!(
            default_directives(Level::DEBUG),
            "warn,valkit_core=debug,valkit=debug"
        );
        assert_eq!(
            default_directives(Level::WARN),
            "warn,valkit_core=warn,valkit=warn"
        );
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(false, Level::WARN);
        init_tracing(true, Level::DEBUG);
    }
}
