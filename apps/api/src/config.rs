use anyhow::{bail, Context, Result};
use std::str::FromStr;

/// Which LLM backend serves job analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Anthropic,
    Mock,
}

impl FromStr for LlmProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            other => bail!("Unsupported LLM_PROVIDER '{other}' (expected 'anthropic' or 'mock')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub llm_provider: LlmProviderKind,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub mock_delay_ms: u64,
    pub analysis_cache_ttl_hours: i64,
    pub cache_cleanup_interval_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_provider: LlmProviderKind = env_or("LLM_PROVIDER", "mock").parse()?;
        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        if llm_provider == LlmProviderKind::Anthropic && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY must be set when LLM_PROVIDER=anthropic");
        }

        let analysis_cache_ttl_hours = parse_env("ANALYSIS_CACHE_TTL_HOURS", 24)?;
        check_cache_ttl(analysis_cache_ttl_hours)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            llm_provider,
            anthropic_api_key,
            anthropic_model: env_or("ANTHROPIC_MODEL", crate::llm_client::DEFAULT_MODEL),
            anthropic_max_tokens: parse_env("ANTHROPIC_MAX_TOKENS", 4096)?,
            mock_delay_ms: parse_env("MOCK_DELAY_MS", 500)?,
            analysis_cache_ttl_hours,
            cache_cleanup_interval_secs: parse_env("CACHE_CLEANUP_INTERVAL_SECS", 3600)?,
            cors_allowed_origins: split_origins(&env_or(
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:5173,http://localhost:3000",
            )),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Longest cache lifetime accepted: one year.
pub const MAX_CACHE_TTL_HOURS: i64 = 24 * 365;

fn check_cache_ttl(hours: i64) -> Result<()> {
    if !(1..=MAX_CACHE_TTL_HOURS).contains(&hours) {
        bail!("ANALYSIS_CACHE_TTL_HOURS must be between 1 and {MAX_CACHE_TTL_HOURS} (got {hours})");
    }
    Ok(())
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_case_insensitively() {
        assert_eq!(
            "Anthropic".parse::<LlmProviderKind>().unwrap(),
            LlmProviderKind::Anthropic
        );
        assert_eq!(" mock ".parse::<LlmProviderKind>().unwrap(), LlmProviderKind::Mock);
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        let err = "openai".parse::<LlmProviderKind>().unwrap_err();
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn test_split_origins_drops_blanks() {
        let origins = split_origins("http://a.test, ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_cache_ttl_range() {
        assert!(check_cache_ttl(24).is_ok());
        assert!(check_cache_ttl(MAX_CACHE_TTL_HOURS).is_ok());
        assert!(check_cache_ttl(0).is_err());
        assert!(check_cache_ttl(-5).is_err());
        assert!(check_cache_ttl(i64::MAX).is_err());
    }
}
