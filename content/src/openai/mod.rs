//! OpenAI chat-completions adapter.

pub mod client;
pub mod errors;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use common::logger::warn_if_slow;

pub use client::OpenAiClient;
pub use errors::OpenAiError;

use crate::prompt::{build_prompt, parse_reply};
use crate::supplier::{ContentSupplier, SupplyError};
use crate::types::{ContentKind, ContentUnit};

/// [`ContentSupplier`] backed by a chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiSupplier {
    client: OpenAiClient,
}

impl OpenAiSupplier {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentSupplier for OpenAiSupplier {
    #[instrument(skip(self), level = "debug")]
    async fn generate(&self, kind: ContentKind, topic: &str) -> Result<ContentUnit, SupplyError> {
        let prompt = build_prompt(kind, topic);

        let reply = warn_if_slow("openai_completion", Duration::from_secs(10), async {
            self.client.complete(&prompt).await
        })
        .await?;

        let unit = parse_reply(&reply).ok_or(SupplyError::EmptyReply)?;

        debug!(has_answer = unit.answer.is_some(), "completion parsed");

        Ok(unit)
    }
}

impl From<OpenAiError> for SupplyError {
    fn from(e: OpenAiError) -> Self {
        match e {
            OpenAiError::NoChoices => SupplyError::EmptyReply,
            other => SupplyError::Upstream(other.to_string()),
        }
    }
}
