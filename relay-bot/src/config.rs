//! Bot configuration, loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Configuration surface of the relay. Missing credentials or base URL are
/// fatal at startup; everything else has a default or is optional.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Model id for chat and vision completions.
    pub chat_model: String,
    /// Model id for audio transcription.
    pub transcribe_model: String,
    /// Externally reachable base URL the webhook is registered under.
    pub webhook_url: String,
    pub webhook_path: String,
    pub port: u16,
    /// SQLite path/URL; persistence is disabled when unset.
    pub database_url: Option<String>,
    pub serper_api_key: Option<String>,
    pub brave_api_key: Option<String>,
    /// Optional Telegram Bot API base URL (points the bot at a mock server in tests).
    pub telegram_api_url: Option<String>,
    pub log_file: String,
}

impl BotConfig {
    /// Loads configuration from environment variables. If `token` is given it
    /// overrides `BOT_TOKEN`.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let chat_model = env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let transcribe_model =
            env::var("TRANSCRIBE_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        let webhook_url = env::var("WEBHOOK_URL").context("WEBHOOK_URL not set")?;
        let webhook_path = env::var("WEBHOOK_PATH").unwrap_or_else(|_| "/webhook".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
        let serper_api_key = env::var("SERPER_API_KEY").ok().filter(|s| !s.trim().is_empty());
        let brave_api_key = env::var("BRAVE_API_KEY").ok().filter(|s| !s.trim().is_empty());
        let telegram_api_url = env::var("TELEGRAM_API_URL").ok();
        let log_file = "logs/relay-bot.log".to_string();

        Ok(Self {
            bot_token,
            openai_api_key,
            openai_base_url,
            chat_model,
            transcribe_model,
            webhook_url,
            webhook_path,
            port,
            database_url,
            serper_api_key,
            brave_api_key,
            telegram_api_url,
            log_file,
        })
    }

    /// Fails fast on configuration the bot cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if self.openai_api_key.trim().is_empty() {
            anyhow::bail!("OPENAI_API_KEY is empty");
        }
        url::Url::parse(&self.webhook_url)
            .with_context(|| format!("WEBHOOK_URL is not a valid URL: {}", self.webhook_url))?;
        if !self.webhook_path.starts_with('/') {
            anyhow::bail!("WEBHOOK_PATH must start with '/': {}", self.webhook_path);
        }
        Ok(())
    }

    /// Full externally reachable webhook endpoint.
    pub fn webhook_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.webhook_url.trim_end_matches('/'),
            self.webhook_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "BOT_TOKEN",
            "OPENAI_API_KEY",
            "OPENAI_BASE_URL",
            "CHAT_MODEL",
            "TRANSCRIBE_MODEL",
            "WEBHOOK_URL",
            "WEBHOOK_PATH",
            "PORT",
            "DATABASE_URL",
            "SERPER_API_KEY",
            "BRAVE_API_KEY",
            "TELEGRAM_API_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();
        env::set_var("BOT_TOKEN", "test_token");
        env::set_var("OPENAI_API_KEY", "test_key");
        env::set_var("WEBHOOK_URL", "https://bot.example.com");

        let config = BotConfig::load(None).unwrap();

        assert_eq!(config.bot_token, "test_token");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.transcribe_model, "whisper-1");
        assert_eq!(config.webhook_path, "/webhook");
        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
        assert!(config.serper_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_config_fails_without_credentials() {
        clear_env();
        env::set_var("OPENAI_API_KEY", "key");
        env::set_var("WEBHOOK_URL", "https://bot.example.com");

        assert!(BotConfig::load(None).is_err());
    }

    #[test]
    #[serial]
    fn test_load_config_with_override_token() {
        clear_env();
        env::set_var("BOT_TOKEN", "env_token");
        env::set_var("OPENAI_API_KEY", "key");
        env::set_var("WEBHOOK_URL", "https://bot.example.com");

        let config = BotConfig::load(Some("override_token".to_string())).unwrap();
        assert_eq!(config.bot_token, "override_token");
    }

    #[test]
    #[serial]
    fn test_webhook_endpoint_joins_base_and_path() {
        clear_env();
        env::set_var("BOT_TOKEN", "t");
        env::set_var("OPENAI_API_KEY", "k");
        env::set_var("WEBHOOK_URL", "https://bot.example.com/");
        env::set_var("WEBHOOK_PATH", "/hook");

        let config = BotConfig::load(None).unwrap();
        assert_eq!(config.webhook_endpoint(), "https://bot.example.com/hook");
    }

    #[test]
    #[serial]
    fn test_validate_rejects_bad_webhook_url() {
        clear_env();
        env::set_var("BOT_TOKEN", "t");
        env::set_var("OPENAI_API_KEY", "k");
        env::set_var("WEBHOOK_URL", "not a url");

        let config = BotConfig::load(None).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_optional_search_keys_are_picked_up() {
        clear_env();
        env::set_var("BOT_TOKEN", "t");
        env::set_var("OPENAI_API_KEY", "k");
        env::set_var("WEBHOOK_URL", "https://bot.example.com");
        env::set_var("SERPER_API_KEY", "serper");
        env::set_var("BRAVE_API_KEY", "brave");
        env::set_var("DATABASE_URL", "relay.db");

        let config = BotConfig::load(None).unwrap();
        assert_eq!(config.serper_api_key.as_deref(), Some("serper"));
        assert_eq!(config.brave_api_key.as_deref(), Some("brave"));
        assert_eq!(config.database_url.as_deref(), Some("relay.db"));
    }
}
