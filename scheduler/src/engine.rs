//! The session scheduler.
//!
//! `start` admits a session through the registry and spawns its tick loop.
//! Each tick:
//!   1. Exits if the session was stopped.
//!   2. Finishes the session once its deadline has passed.
//!   3. Picks a topic, fetches a unit through the retry fetcher, delivers it.
//!   4. Sleeps for `interval` (cut short by a stop or by the deadline).

use std::sync::Arc;

use content::{ContentKind, ContentSupplier, TopicPicker};
use session::{Session, SessionKey, SessionRegistry, SessionTiming};
use tokio::time::{Instant, sleep_until};
use tracing::{Instrument, debug, info, warn};

use common::logger::session_span;

use crate::error::SchedulerError;
use crate::retry::RetryFetcher;
use crate::types::{
    DeliverySink, SchedulerConfig, SessionNotice, StartOutcome, StopOutcome, validate_timing,
};

pub struct SessionScheduler {
    cfg: SchedulerConfig,
    registry: SessionRegistry,
    ctx: Arc<TickContext>,
}

/// Everything a running session task needs, shared by all of them.
struct TickContext {
    registry: SessionRegistry,
    fetcher: RetryFetcher,
    sink: Arc<dyn DeliverySink>,
    topics: TopicPicker,
}

impl SessionScheduler {
    pub fn new(
        cfg: SchedulerConfig,
        supplier: Arc<dyn ContentSupplier>,
        sink: Arc<dyn DeliverySink>,
        topics: TopicPicker,
    ) -> Result<Self, SchedulerError> {
        cfg.validate()?;

        let registry = SessionRegistry::new();
        let ctx = Arc::new(TickContext {
            registry: registry.clone(),
            fetcher: RetryFetcher::new(supplier, cfg.retry),
            sink,
            topics,
        });

        Ok(Self { cfg, registry, ctx })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Start a `kind` session for `key` with the configured timing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, key: SessionKey, kind: ContentKind) -> StartOutcome {
        self.admit(key, kind, self.cfg.timing_for(kind))
    }

    /// Start a session with explicit timing instead of the configured one.
    pub fn start_with(
        &self,
        key: SessionKey,
        kind: ContentKind,
        timing: SessionTiming,
    ) -> Result<StartOutcome, SchedulerError> {
        validate_timing(kind, &timing)?;
        Ok(self.admit(key, kind, timing))
    }

    /// Request a cooperative stop. The in-flight tick, if any, completes.
    pub fn stop(&self, key: &SessionKey) -> StopOutcome {
        match self.registry.stop(key) {
            Some(session) => {
                info!(
                    session_key = %key,
                    session_id = %session.id,
                    "session stop requested"
                );
                StopOutcome::Stopped { kind: session.kind }
            }
            None => StopOutcome::NotActive,
        }
    }

    pub fn is_running(&self, key: &SessionKey) -> bool {
        self.registry.is_running(key)
    }

    pub fn session(&self, key: &SessionKey) -> Option<Session> {
        self.registry.get(key)
    }

    /// Stop every running session. Returns how many were stopped.
    pub fn shutdown(&self) -> usize {
        let stopped = self.registry.stop_all();
        info!(count = stopped.len(), "all sessions stopped");
        stopped.len()
    }

    fn admit(&self, key: SessionKey, kind: ContentKind, timing: SessionTiming) -> StartOutcome {
        let Some(session) = self.registry.try_start(key.clone(), kind, timing) else {
            let kind = self.registry.get(&key).map_or(kind, |s| s.kind);
            return StartOutcome::AlreadyActive { kind };
        };

        let span = session_span(&session.key, &session.id, &session.kind);
        let session_id = session.id;
        let ctx = Arc::clone(&self.ctx);

        tokio::spawn(ctx.run(session).instrument(span));

        StartOutcome::Started { session_id, timing }
    }
}

impl TickContext {
    async fn run(self: Arc<Self>, session: Session) {
        let cancel = session.cancellation();
        let mut delivered: u64 = 0;

        info!(
            interval_s = session.interval().as_secs_f64(),
            deadline_s = session.deadline().as_secs_f64(),
            "session started"
        );

        loop {
            if cancel.is_cancelled() || !self.registry.is_current(&session.key, session.id) {
                // No-op when a stop already evicted this instance.
                self.registry.finish(&session.key, session.id);
                info!(delivered, "session stopped");
                return;
            }

            if session.is_expired(Instant::now()) {
                self.finish(&session, delivered).await;
                return;
            }

            let topic = self.topics.pick();
            let unit = self.fetcher.fetch(session.kind, topic).await;

            match self.sink.deliver(&session.key, &unit).await {
                Ok(()) => {
                    delivered += 1;
                    debug!(delivered, topic, "unit delivered");
                }
                Err(e) => {
                    warn!(error = %e, topic, "delivery failed; session continues");
                }
            }

            let wake_at = (Instant::now() + session.interval()).min(session.deadline_at());

            tokio::select! {
                _ = sleep_until(wake_at) => {}
                _ = cancel.cancelled() => {}
            }
        }
    }

    async fn finish(&self, session: &Session, delivered: u64) {
        // A concurrent stop may have won; only the evicting side notifies.
        if self.registry.finish(&session.key, session.id).is_none() {
            info!(delivered, "session stopped");
            return;
        }

        info!(delivered, "session deadline reached");

        let notice = SessionNotice::DeadlineReached {
            kind: session.kind,
            delivered,
        };

        if let Err(e) = self.sink.notify(&session.key, &notice).await {
            warn!(error = %e, "failed to send deadline notice");
        }
    }
}
