use anyhow::{Context, Result};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Nothing is required: an empty key list defers to the provider's default auth.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_keys: Vec<String>,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_keys: parse_api_keys(&std::env::var("GEMINI_API_KEYS").unwrap_or_default()),
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

/// Splits a comma-separated credential list, dropping blank entries.
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_keys_splits_and_trims() {
        assert_eq!(parse_api_keys("k1, k2 ,k3"), vec!["k1", "k2", "k3"]);
    }

    #[test]
    fn test_parse_api_keys_drops_blanks() {
        assert_eq!(parse_api_keys(" ,k1,,  ,"), vec!["k1"]);
    }

    #[test]
    fn test_parse_api_keys_empty_string_yields_no_keys() {
        assert!(parse_api_keys("").is_empty());
    }
}
