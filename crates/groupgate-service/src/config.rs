//! Service configuration.
//!
//! All configuration is read once at startup into an immutable
//! [`ServiceConfig`] that is passed to every component; nothing reads the
//! environment after init.

/// Default public API base for the chat platform.
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Default public API base for the payment provider.
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the `RocksDB` data directory (default: "./data/groupgate").
    pub data_dir: String,

    /// Bot API token.
    pub telegram_token: String,

    /// Chat-platform API base URL (overridable for tests).
    pub telegram_api_base: String,

    /// Chat ID of the gated access group.
    pub group_chat_id: i64,

    /// Public username of the bot, used for deep links.
    pub bot_username: String,

    /// Optional chat ID for operator notifications.
    pub admin_chat_id: Option<i64>,

    /// Payment-provider secret API key.
    pub stripe_secret_key: String,

    /// Webhook signing secret for billing events.
    pub stripe_webhook_secret: String,

    /// Payment-provider API base URL (overridable for tests).
    pub stripe_api_base: String,

    /// Identifier of the recurring price members subscribe to.
    pub price_id: String,

    /// Public base URL of this service, used to register the bot webhook.
    pub public_base_url: String,

    /// Platform file IDs of the free sample photos.
    pub sample_photo_ids: Vec<String>,

    /// Seconds between expiry-sweeper passes (default: 86400).
    pub sweep_interval_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more required environment variables are unset.
    #[error("missing required environment variables: {0}")]
    MissingVars(String),

    /// A variable was present but not parseable.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// The environment variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables are checked together so one startup failure
    /// reports every missing name at once.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is unset or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| match std::env::var(name) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => {
                missing.push(name);
                None
            }
        };

        let telegram_token = require("TELEGRAM_TOKEN");
        let group_chat_id = require("GROUP_CHAT_ID");
        let stripe_secret_key = require("STRIPE_SECRET_KEY");
        let stripe_webhook_secret = require("STRIPE_WEBHOOK_SECRET");
        let price_id = require("PRICE_ID");
        let public_base_url = require("PUBLIC_BASE_URL");
        let bot_username = require("BOT_USERNAME");

        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing.join(", ")));
        }

        // The unwraps above are guarded by the missing check.
        let group_chat_id_raw = group_chat_id.unwrap_or_default();
        let group_chat_id =
            group_chat_id_raw
                .parse::<i64>()
                .map_err(|_| ConfigError::Invalid {
                    name: "GROUP_CHAT_ID",
                    value: group_chat_id_raw.clone(),
                })?;

        let admin_chat_id = match std::env::var("ADMIN_CHAT_ID") {
            Ok(raw) if !raw.is_empty() => {
                Some(raw.parse::<i64>().map_err(|_| ConfigError::Invalid {
                    name: "ADMIN_CHAT_ID",
                    value: raw.clone(),
                })?)
            }
            _ => None,
        };

        Ok(Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data/groupgate".into()),
            telegram_token: telegram_token.unwrap_or_default(),
            telegram_api_base: std::env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_BASE.into()),
            group_chat_id,
            bot_username: bot_username.unwrap_or_default(),
            admin_chat_id,
            stripe_secret_key: stripe_secret_key.unwrap_or_default(),
            stripe_webhook_secret: stripe_webhook_secret.unwrap_or_default(),
            stripe_api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_STRIPE_API_BASE.into()),
            price_id: price_id.unwrap_or_default(),
            public_base_url: public_base_url
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            sample_photo_ids: std::env::var("SAMPLE_PHOTO_IDS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24 * 60 * 60),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// The bot-update webhook path, namespaced by the bot token so only the
    /// platform can hit it.
    #[must_use]
    pub fn telegram_webhook_path(&self) -> String {
        format!("/telegram/{}", self.telegram_token)
    }

    /// The publicly reachable bot-update webhook URL.
    #[must_use]
    pub fn telegram_webhook_url(&self) -> String {
        format!("{}{}", self.public_base_url, self.telegram_webhook_path())
    }

    /// Deep link to the bot chat, used as the fallback checkout target.
    #[must_use]
    pub fn bot_deep_link(&self) -> String {
        format!("https://t.me/{}", self.bot_username)
    }
}
