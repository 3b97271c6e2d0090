use async_trait::async_trait;
use content::ContentUnit;
use scheduler::{DeliveryError, DeliverySink, SessionNotice};
use session::SessionKey;

use super::client::TelegramClient;
use crate::render::{render_notice, render_unit};

/// Delivers session output as chat messages. Session keys are chat ids.
#[derive(Clone)]
pub struct TelegramSink {
    client: TelegramClient,
}

impl TelegramSink {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }

    async fn send(&self, key: &SessionKey, text: &str) -> Result<(), DeliveryError> {
        let chat_id = chat_id(key)?;
        self.client
            .send_message(chat_id, text)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}

pub fn chat_id(key: &SessionKey) -> Result<i64, DeliveryError> {
    key.as_str()
        .parse()
        .map_err(|_| DeliveryError::InvalidDestination(key.to_string()))
}

#[async_trait]
impl DeliverySink for TelegramSink {
    async fn deliver(&self, key: &SessionKey, unit: &ContentUnit) -> Result<(), DeliveryError> {
        self.send(key, &render_unit(unit)).await
    }

    async fn notify(&self, key: &SessionKey, notice: &SessionNotice) -> Result<(), DeliveryError> {
        self.send(key, &render_notice(notice)).await
    }
}
