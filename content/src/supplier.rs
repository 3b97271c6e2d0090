use async_trait::async_trait;
use thiserror::Error;

use crate::types::{ContentKind, ContentUnit};

/// Produces one [`ContentUnit`] for a topic.
///
/// A failure is an ordinary `Err`, never a panic: the retry wrapper counts
/// each one as a spent attempt.
#[async_trait]
pub trait ContentSupplier: Send + Sync + 'static {
    async fn generate(&self, kind: ContentKind, topic: &str) -> Result<ContentUnit, SupplyError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupplyError {
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("upstream returned an empty reply")]
    EmptyReply,
}

/// Offline supplier used when no LLM credentials are configured.
///
/// Questions are built from fixed templates, so every call succeeds.
#[derive(Debug, Default, Clone)]
pub struct CannedSupplier;

#[async_trait]
impl ContentSupplier for CannedSupplier {
    async fn generate(&self, kind: ContentKind, topic: &str) -> Result<ContentUnit, SupplyError> {
        let unit = match kind {
            ContentKind::Flashcard => ContentUnit::new(
                format!("Name and explain one core concept of {topic}."),
                Some(format!(
                    "Check your explanation against your notes on {topic}."
                )),
            ),
            ContentKind::Interview => ContentUnit::question(format!(
                "Tell me about a problem you solved involving {topic}. What was the root cause?"
            )),
        };
        Ok(unit)
    }
}
