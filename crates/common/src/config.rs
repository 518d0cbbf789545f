use crate::{Error, OperatingMode, Result};

pub const DEFAULT_BINANCE_BASE_URL: &str = "https://fapi.binance.com";
pub const DEFAULT_BOT_CONFIG_PATH: &str = "config/bot.toml";

/// Process-wide settings loaded from environment variables at startup.
///
/// Trading parameters (pairs, windows, thresholds, cadence) live in the TOML
/// file pointed to by `bot_config_path`; this struct carries secrets and the
/// operating mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: OperatingMode,

    // Exchange credentials, only required in live mode
    pub binance_api_key: Option<String>,
    pub binance_secret: Option<String>,
    pub binance_base_url: String,

    // Telegram alerts are disabled when no token is set
    pub telegram_token: Option<String>,
    pub telegram_chat_ids: Vec<i64>,

    pub bot_config_path: String,
    /// True when `BOT_CONFIG_PATH` was set explicitly.
    pub bot_config_path_explicit: bool,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first
    /// if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match var("TRADING_MODE") {
            Some(raw) => raw.parse::<OperatingMode>()?,
            None => OperatingMode::Simulate,
        };

        let binance_api_key = var("BINANCE_API_KEY");
        let binance_secret = var("BINANCE_SECRET");
        if mode == OperatingMode::Live && (binance_api_key.is_none() || binance_secret.is_none()) {
            return Err(Error::Config(
                "live mode requires BINANCE_API_KEY and BINANCE_SECRET".to_string(),
            ));
        }

        let telegram_chat_ids = match var("TELEGRAM_CHAT_IDS") {
            Some(raw) => parse_chat_ids(&raw)?,
            None => Vec::new(),
        };

        let telegram_token = var("TELEGRAM_TOKEN");
        if telegram_token.is_some() && telegram_chat_ids.is_empty() {
            return Err(Error::Config(
                "TELEGRAM_TOKEN is set but TELEGRAM_CHAT_IDS is empty".to_string(),
            ));
        }

        let explicit_path = var("BOT_CONFIG_PATH");

        Ok(Config {
            mode,
            binance_api_key,
            binance_secret,
            binance_base_url: var("BINANCE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BINANCE_BASE_URL.to_string()),
            telegram_token,
            telegram_chat_ids,
            bot_config_path_explicit: explicit_path.is_some(),
            bot_config_path: explicit_path.unwrap_or_else(|| DEFAULT_BOT_CONFIG_PATH.to_string()),
        })
    }
}

fn parse_chat_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                Error::Config(format!("TELEGRAM_CHAT_IDS contains non-numeric ID: '{s}'"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_simulate_without_credentials() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.mode, OperatingMode::Simulate);
        assert_eq!(cfg.binance_base_url, DEFAULT_BINANCE_BASE_URL);
        assert_eq!(cfg.bot_config_path, DEFAULT_BOT_CONFIG_PATH);
        assert!(!cfg.bot_config_path_explicit);
        assert!(cfg.telegram_token.is_none());
    }

    #[test]
    fn live_mode_requires_credentials() {
        let err = config_from(&[("TRADING_MODE", "live"), ("BINANCE_API_KEY", "k")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let cfg = config_from(&[
            ("TRADING_MODE", "live"),
            ("BINANCE_API_KEY", "k"),
            ("BINANCE_SECRET", "s"),
            ("BINANCE_BASE_URL", "https://testnet.binancefuture.com/"),
        ])
        .unwrap();
        assert_eq!(cfg.mode, OperatingMode::Live);
        assert_eq!(cfg.binance_base_url, "https://testnet.binancefuture.com");
    }

    #[test]
    fn chat_ids_are_parsed() {
        let cfg = config_from(&[("TELEGRAM_TOKEN", "t"), ("TELEGRAM_CHAT_IDS", "12, -34 ,")]).unwrap();
        assert_eq!(cfg.telegram_chat_ids, vec![12, -34]);

        assert!(config_from(&[("TELEGRAM_CHAT_IDS", "12,abc")]).is_err());
        assert!(config_from(&[("TELEGRAM_TOKEN", "t")]).is_err());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(config_from(&[("TRADING_MODE", "backtest")]).is_err());
    }
}
