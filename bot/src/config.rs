use std::time::Duration;

use content::TopicPicker;
use content::openai::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use scheduler::{RetryPolicy, SchedulerConfig};
use session::SessionTiming;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },

    #[error("FLASHCARD_TOPICS must name at least one topic")]
    NoTopics,

    #[error("failed to load .env: {0}")]
    Dotenv(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    // =========================
    // Telegram transport
    // =========================
    /// Bot token. Only required when running the telegram transport.
    pub telegram_bot_token: Option<String>,

    /// Bot API base URL, without the `/bot<token>` suffix.
    pub telegram_api_url: String,

    /// Long-poll timeout passed to `getUpdates`.
    pub telegram_poll_timeout: Duration,

    // =========================
    // Content generation
    // =========================
    /// With no key the bot falls back to canned questions.
    pub openai_api_key: Option<String>,

    pub openai_base_url: String,

    pub openai_model: String,

    /// Topics drawn (uniformly at random) for each generated question.
    pub topics: TopicPicker,

    // =========================
    // Sessions
    // =========================
    /// Per-kind timing and the retry policy around generation.
    pub scheduler: SchedulerConfig,

    /// `APP_ENV=production` switches logs to JSON.
    pub json_logs: bool,
}

impl AppConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv_loaded(dotenvy::dotenv())?;
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let flashcard = SessionTiming::from_secs(
            positive(&get, "FLASHCARD_INTERVAL_SECS", 30)?,
            positive(&get, "FLASHCARD_DEADLINE_SECS", 600)?,
        );
        let interview = SessionTiming::from_secs(
            positive(&get, "INTERVIEW_INTERVAL_SECS", 20)?,
            positive(&get, "INTERVIEW_DEADLINE_SECS", 900)?,
        );

        let max_attempts = positive(&get, "GENERATION_MAX_ATTEMPTS", 3)?;
        let retry_delay_ms = number(&get, "GENERATION_RETRY_DELAY_MS", 2_000)?;
        let retry = RetryPolicy::new(
            u32::try_from(max_attempts).unwrap_or(u32::MAX),
            Duration::from_millis(retry_delay_ms),
        );

        let topics = match get("FLASHCARD_TOPICS") {
            Some(raw) => TopicPicker::new(raw.split(',')).ok_or(ConfigError::NoTopics)?,
            None => TopicPicker::with_defaults(),
        };

        Ok(Self {
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| "https://api.telegram.org".to_string()),
            telegram_poll_timeout: Duration::from_secs(positive(
                &get,
                "TELEGRAM_POLL_TIMEOUT_SECS",
                30,
            )?),

            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            topics,

            scheduler: SchedulerConfig {
                flashcard,
                interview,
                retry,
            },

            json_logs: get("APP_ENV").as_deref() == Some("production"),
        })
    }
}

/// A missing `.env` is the normal case in production; anything else is not.
fn dotenv_loaded<T>(res: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match res {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Dotenv(e.to_string())),
    }
}

fn number<G>(get: &G, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

fn positive<G>(get: &G, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match number(get, var, default)? {
        0 => Err(ConfigError::Zero { var }),
        n => Ok(n),
    }
}
