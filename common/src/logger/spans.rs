use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{Level, Span};

/// Root span for one running session task.
///
/// Everything logged by the tick loop, the retry wrapper and the sinks
/// inherits `session_key`, `session_id` and `kind` from it.
pub fn session_span(key: &dyn Display, session_id: &dyn Display, kind: &dyn Display) -> Span {
    tracing::span!(
        Level::INFO,
        "session",
        session_key = %key,
        session_id = %session_id,
        kind = %kind
    )
}

/// Span for handling one inbound chat command.
pub fn command_span(key: &dyn Display, command: &str) -> Span {
    tracing::span!(Level::INFO, "command", session_key = %key, command = command)
}

pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}
