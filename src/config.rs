//! Runtime settings for the Portal client.
//!
//! Values come from the process environment (populated from `.env` or the
//! bundled `assets/config.env` at startup). Anything missing or unparsable
//! falls back to the defaults below.

use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

pub const DEFAULT_CHAT_API_BASE: &str = "http://localhost:8000/api/chat";
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:8000/api/upload";
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
pub const DEFAULT_ALLOWED_EXTENSION: &str = "csv";
pub const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::INFO;

/// Process-wide settings, read once on first use.
pub static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub chat_api_base: String,
    pub upload_url: String,
    pub max_file_size_mb: u64,
    pub allowed_extension: String,
    pub log_level: tracing::Level,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chat_api_base: DEFAULT_CHAT_API_BASE.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            allowed_extension: DEFAULT_ALLOWED_EXTENSION.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(fallback)
        };

        Self {
            chat_api_base: text("PORTAL_CHAT_API_BASE", defaults.chat_api_base),
            upload_url: text("PORTAL_UPLOAD_URL", defaults.upload_url),
            max_file_size_mb: parsed(&lookup, "PORTAL_MAX_FILE_SIZE_MB", defaults.max_file_size_mb),
            allowed_extension: text("PORTAL_ALLOWED_EXTENSION", defaults.allowed_extension),
            log_level: parsed(&lookup, "PORTAL_LOG", defaults.log_level),
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, fallback: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return fallback;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, default = ?fallback, "ignoring unparsable setting");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_file_size_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PORTAL_CHAT_API_BASE", "https://portal.example/api/chat"),
            ("PORTAL_MAX_FILE_SIZE_MB", "25"),
            ("PORTAL_ALLOWED_EXTENSION", "tsv"),
            ("PORTAL_LOG", "debug"),
        ]));
        assert_eq!(settings.chat_api_base, "https://portal.example/api/chat");
        assert_eq!(settings.upload_url, DEFAULT_UPLOAD_URL);
        assert_eq!(settings.max_file_size_bytes(), 25 * 1024 * 1024);
        assert_eq!(settings.allowed_extension, "tsv");
        assert_eq!(settings.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn bad_values_fall_back() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PORTAL_MAX_FILE_SIZE_MB", "ten"),
            ("PORTAL_LOG", "chatty"),
            ("PORTAL_UPLOAD_URL", "   "),
        ]));
        assert_eq!(settings.max_file_size_mb, DEFAULT_MAX_FILE_SIZE_MB);
        assert_eq!(settings.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(settings.upload_url, DEFAULT_UPLOAD_URL);
    }
}
