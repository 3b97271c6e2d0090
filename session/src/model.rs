use std::fmt;
use std::time::Duration;

use content::ContentKind;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Identifies one session *instance*. A restarted key gets a fresh id.
pub type SessionId = uuid::Uuid;

/// Opaque conversation identifier supplied by the transport (e.g. a chat id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SessionKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for SessionKey {
    fn from(chat_id: i64) -> Self {
        Self(chat_id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopped,
}

/// Cadence and lifetime of a session, fixed when it is admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Gap between the end of one delivery and the next generation.
    pub interval: Duration,
    /// Total lifetime, measured from the session's own start.
    pub deadline: Duration,
}

impl SessionTiming {
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    pub fn from_secs(interval_secs: u64, deadline_secs: u64) -> Self {
        Self::new(
            Duration::from_secs(interval_secs),
            Duration::from_secs(deadline_secs),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub key: SessionKey,
    pub kind: ContentKind,

    pub started_at: Instant,
    pub timing: SessionTiming,

    pub state: SessionState,

    /// Fired once when the session leaves the registry.
    pub(crate) cancel: CancellationToken,
}

impl Session {
    pub(crate) fn start(key: SessionKey, kind: ContentKind, timing: SessionTiming) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            key,
            kind,
            started_at: Instant::now(),
            timing,
            state: SessionState::Running,
            cancel: CancellationToken::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.timing.interval
    }

    pub fn deadline(&self) -> Duration {
        self.timing.deadline
    }

    pub fn deadline_at(&self) -> Instant {
        self.started_at + self.timing.deadline
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// True once the session has lived for its whole deadline.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.timing.deadline
    }

    /// Token that resolves when the session is stopped or finished.
    ///
    /// This is a child of the registry-owned token: cancelling it does not
    /// stop the session, only `SessionRegistry::stop` / `finish` do.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.child_token()
    }
}
