use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::errors::TelegramError;
use super::types::{ApiResponse, GetUpdates, SendMessage, Update};

/// Upper bound for a single `sendMessage`, so a slow chat cannot stall the
/// poll loop for a whole long-poll window.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Slack added on top of the long-poll window for `getUpdates`.
const POLL_SLACK: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    /// `{api_url}/bot{token}`. Never logged.
    base: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    /// `poll_timeout` is the long-poll window; `getUpdates` requests are
    /// allowed to run a little past it, every other call gets [`SEND_TIMEOUT`].
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            poll_timeout,
        })
    }

    pub fn request_timeout(&self, method: &str) -> Duration {
        match method {
            "getUpdates" => self.poll_timeout + POLL_SLACK,
            _ => SEND_TIMEOUT,
        }
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message"],
        };

        let updates: Vec<Update> = self.call("getUpdates", &body).await?;
        debug!(count = updates.len(), "updates received");
        Ok(updates)
    }

    #[instrument(skip(self, text), fields(chars = text.len()), level = "debug")]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let _: serde_json::Value = self
            .call("sendMessage", &SendMessage { chat_id, text })
            .await?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base, method);

        // The URL embeds the token, so it is stripped from transport errors.
        // Bot API reports failures in the body (often with a 4xx status), so
        // the envelope is decoded regardless of status.
        let resp: ApiResponse<T> = self
            .http
            .post(&url)
            .timeout(self.request_timeout(method))
            .json(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        match (resp.ok, resp.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api(
                resp.description
                    .unwrap_or_else(|| format!("{method} failed without description")),
            )),
        }
    }
}
