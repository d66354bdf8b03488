#![forbid(unsafe_code)]

//! Runtime configuration for forms and lookups.

use std::time::Duration;

use formbind_widgets::LIMITED_WIDTH_COLUMNS;

/// Environment variable overriding [`FormConfig::lookup_timeout`], in milliseconds.
pub const ENV_LOOKUP_TIMEOUT_MS: &str = "FORMBIND_LOOKUP_TIMEOUT_MS";
/// Environment variable overriding [`FormConfig::limited_width`], in columns.
pub const ENV_LIMITED_WIDTH: &str = "FORMBIND_LIMITED_WIDTH";

/// Tunables shared by form controllers and remote lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// How long a remote lookup may stay in flight before it is cancelled.
    pub lookup_timeout: Duration,
    /// Column budget for regions rendered with limited width.
    pub limited_width: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(30),
            limited_width: LIMITED_WIDTH_COLUMNS,
        }
    }
}

impl FormConfig {
    /// Defaults, overridden by `FORMBIND_*` environment variables that parse.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`] but reading through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(ms) = lookup(ENV_LOOKUP_TIMEOUT_MS).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.lookup_timeout = Duration::from_millis(ms);
        }
        if let Some(cols) = lookup(ENV_LIMITED_WIDTH).and_then(|v| v.trim().parse::<usize>().ok()) {
            config.limited_width = cols;
        }
        config
    }

    #[must_use]
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    #[must_use]
    pub fn limited_width(mut self, columns: usize) -> Self {
        self.limited_width = columns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FormConfig::default();
        assert_eq!(config.lookup_timeout, Duration::from_secs(30));
        assert_eq!(config.limited_width, LIMITED_WIDTH_COLUMNS);
    }

    #[test]
    fn lookup_overrides() {
        let config = FormConfig::from_lookup(|key| match key {
            ENV_LOOKUP_TIMEOUT_MS => Some("1500".into()),
            ENV_LIMITED_WIDTH => Some(" 12 ".into()),
            _ => None,
        });
        assert_eq!(config.lookup_timeout, Duration::from_millis(1500));
        assert_eq!(config.limited_width, 12);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let config = FormConfig::from_lookup(|_| Some("soon".into()));
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn builder() {
        let config = FormConfig::default()
            .lookup_timeout(Duration::from_millis(5))
            .limited_width(8);
        assert_eq!(config.lookup_timeout, Duration::from_millis(5));
        assert_eq!(config.limited_width, 8);
    }
}
