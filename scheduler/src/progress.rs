//! Countdown view of a session, independent of the tick loop.
//!
//! This is what `/status` shows: given only when the session started and its
//! timing, where it should be now under ideal (zero-latency) generation.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based index of the unit currently on screen; 0 before the first.
    pub tick_index: u64,
    /// Units the whole session is expected to deliver.
    pub total_ticks: u64,
    pub elapsed: Duration,
    pub remaining: Duration,
    /// Time until the next unit, `None` when no further unit is due.
    pub next_in: Option<Duration>,
}

impl SessionProgress {
    pub fn is_finished(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Ticks land at `0, interval, 2*interval, ...` strictly before `deadline`.
pub fn expected_ticks(interval: Duration, deadline: Duration) -> u64 {
    let interval = interval.as_nanos();
    if interval == 0 {
        return 0;
    }
    deadline.as_nanos().div_ceil(interval) as u64
}

pub fn session_progress(
    now: Instant,
    started_at: Instant,
    interval: Duration,
    deadline: Duration,
) -> SessionProgress {
    let elapsed = now.saturating_duration_since(started_at).min(deadline);
    let remaining = deadline - elapsed;
    let total_ticks = expected_ticks(interval, deadline);

    if remaining.is_zero() || total_ticks == 0 {
        return SessionProgress {
            tick_index: total_ticks,
            total_ticks,
            elapsed,
            remaining,
            next_in: None,
        };
    }

    let done = (elapsed.as_nanos() / interval.as_nanos()) as u64;
    let tick_index = (done + 1).min(total_ticks);

    let next_at = interval.saturating_mul(u32::try_from(tick_index).unwrap_or(u32::MAX));
    let next_in = (tick_index < total_ticks && next_at < deadline).then(|| next_at - elapsed);

    SessionProgress {
        tick_index,
        total_ticks,
        elapsed,
        remaining,
        next_in,
    }
}
