use std::env;
use std::sync::OnceLock;

static DEBUG: OnceLock<bool> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// When enabled, error envelopes carry a `trace` field with captured
    /// backtrace text. Never enable in production.
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let debug = env::var("APP_DEBUG")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self { debug }
    }
}

/// Whether debug mode is on. Read once from the environment and cached
/// for the lifetime of the process.
pub fn debug_enabled() -> bool {
    *DEBUG.get_or_init(|| AppConfig::from_env().debug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_defaults_to_false() {
        // Fresh config without APP_DEBUG set in the test environment.
        if env::var("APP_DEBUG").is_err() {
            assert!(!AppConfig::from_env().debug);
        }
    }
}
