use anyhow::{Context, Result};

use crate::render::Backend;

/// Application configuration loaded from environment variables.
/// Every variable is optional; see `Default` for the fallbacks.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Enables `/api/v1/enhance` when set.
    pub anthropic_api_key: Option<String>,
    /// Backend used when a render request does not name one.
    pub default_backend: Backend,
    pub pdf_compress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            default_backend: Backend::Procedural,
            pdf_compress: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        let defaults = Config::default();

        Ok(Config {
            port: match optional_env("PORT") {
                Some(port) => port.parse::<u16>().context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            default_backend: match optional_env("DEFAULT_BACKEND") {
                Some(name) => name
                    .parse()
                    .with_context(|| format!("DEFAULT_BACKEND '{name}' is not a backend"))?,
                None => defaults.default_backend,
            },
            pdf_compress: match optional_env("PDF_COMPRESS") {
                Some(flag) => parse_flag(&flag).context("PDF_COMPRESS must be true or false")?,
                None => defaults.pdf_compress,
            },
        })
    }
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag(" off ").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_backend, Backend::Procedural);
        assert!(config.pdf_compress);
        assert!(config.anthropic_api_key.is_none());
    }
}
