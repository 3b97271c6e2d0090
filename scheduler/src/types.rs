//! Shared types used by the scheduler subsystem.

use std::time::Duration;

use async_trait::async_trait;
use content::{ContentKind, ContentUnit};
use session::{SessionId, SessionKey, SessionTiming};
use thiserror::Error;

use crate::error::SchedulerError;
use crate::retry::RetryPolicy;

/// Timing and retry knobs for all sessions started by one scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Cadence and lifetime of `/flashcard` sessions.
    pub flashcard: SessionTiming,

    /// Cadence and lifetime of `/interview` sessions.
    pub interview: SessionTiming,

    /// How hard to push on a failing content supplier each tick.
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            flashcard: SessionTiming::from_secs(30, 600),
            interview: SessionTiming::from_secs(20, 900),
            retry: RetryPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn timing_for(&self, kind: ContentKind) -> SessionTiming {
        match kind {
            ContentKind::Flashcard => self.flashcard,
            ContentKind::Interview => self.interview,
        }
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        validate_timing(ContentKind::Flashcard, &self.flashcard)?;
        validate_timing(ContentKind::Interview, &self.interview)?;

        if self.retry.max_attempts == 0 {
            return Err(SchedulerError::NoAttempts);
        }

        Ok(())
    }
}

pub(crate) fn validate_timing(
    kind: ContentKind,
    timing: &SessionTiming,
) -> Result<(), SchedulerError> {
    if timing.interval == Duration::ZERO {
        return Err(SchedulerError::ZeroInterval { kind });
    }
    if timing.deadline == Duration::ZERO {
        return Err(SchedulerError::ZeroDeadline { kind });
    }
    Ok(())
}

/// Result of a start request, relayed to the user by the command router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started {
        session_id: SessionId,
        timing: SessionTiming,
    },
    AlreadyActive {
        kind: ContentKind,
    },
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started { .. })
    }
}

/// Result of a stop request. Stopping an idle key is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { kind: ContentKind },
    NotActive,
}

/// Out-of-band messages a session sends besides its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    DeadlineReached { kind: ContentKind, delivered: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),
}

/// Where a running session sends its output (chat message, console, ...).
///
/// Failures are logged by the scheduler and never retried; the session
/// carries on with its next tick.
#[async_trait]
pub trait DeliverySink: Send + Sync + 'static {
    async fn deliver(&self, key: &SessionKey, unit: &ContentUnit) -> Result<(), DeliveryError>;

    async fn notify(&self, key: &SessionKey, notice: &SessionNotice) -> Result<(), DeliveryError>;
}
