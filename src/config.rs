use thiserror::Error;

const DEFAULT_LINK_API_URL: &str = "https://ravy.org/api/v1";
const DEFAULT_USER_AGENT: &str = "Scripty";

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub link_api_url: String,
    pub link_api_token: Option<String>,
    pub invite_url: Option<String>,
    pub user_agent: String,
}

impl Config {
    /// Reads the configuration from the environment, loading `.env` first if
    /// one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            discord_token: optional("DISCORD_TOKEN")
                .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string()))?,
            link_api_url: optional("LINK_API_URL").unwrap_or_else(|| DEFAULT_LINK_API_URL.to_string()),
            link_api_token: optional("LINK_API_TOKEN"),
            invite_url: optional("INVITE_URL"),
            user_agent: optional("REDDIT_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn token_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Missing required environment variable: DISCORD_TOKEN");

        let err = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.link_api_url, DEFAULT_LINK_API_URL);
        assert_eq!(config.link_api_token, None);
        assert_eq!(config.invite_url, None);
        assert_eq!(config.user_agent, "Scripty");
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "abc"),
            ("LINK_API_URL", "http://localhost:8080"),
            ("LINK_API_TOKEN", "secret"),
            ("INVITE_URL", "https://discord.com/oauth2/authorize?client_id=1"),
            ("REDDIT_USER_AGENT", "scripty-test"),
        ]))
        .unwrap();

        assert_eq!(config.link_api_url, "http://localhost:8080");
        assert_eq!(config.link_api_token.as_deref(), Some("secret"));
        assert!(config.invite_url.is_some());
        assert_eq!(config.user_agent, "scripty-test");
    }
}
