use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL. `None` runs the tracker on the in-process store.
    pub database_url: Option<String>,
    /// Oracle API keys, in rotation order.
    pub anthropic_api_keys: Vec<String>,
    pub telegram_bot_token: Option<String>,
    pub whatsapp: Option<WhatsAppConfig>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub access_token: String,
    pub phone_number_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let raw_keys = optional_env("ANTHROPIC_API_KEYS")
            .or_else(|| optional_env("ANTHROPIC_API_KEY"))
            .context("Required environment variable 'ANTHROPIC_API_KEYS' is not set")?;
        let anthropic_api_keys = parse_key_list(&raw_keys)?;

        let whatsapp = match (
            optional_env("WHATSAPP_ACCESS_TOKEN"),
            optional_env("WHATSAPP_PHONE_NUMBER_ID"),
        ) {
            (Some(access_token), Some(phone_number_id)) => Some(WhatsAppConfig {
                access_token,
                phone_number_id,
            }),
            (None, None) => None,
            _ => bail!(
                "WHATSAPP_ACCESS_TOKEN and WHATSAPP_PHONE_NUMBER_ID must be set together"
            ),
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_keys,
            telegram_bot_token: optional_env("TELEGRAM_BOT_TOKEN"),
            whatsapp,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating blank values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_key_list(raw: &str) -> Result<Vec<String>> {
    let keys: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect();
    if keys.is_empty() {
        bail!("ANTHROPIC_API_KEYS must contain at least one key");
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_list_splits_and_trims() {
        let keys = parse_key_list(" sk-one , sk-two,,sk-three ").unwrap();
        assert_eq!(keys, vec!["sk-one", "sk-two", "sk-three"]);
    }

    #[test]
    fn test_parse_key_list_rejects_only_separators() {
        assert!(parse_key_list(" , ,").is_err());
    }
}
