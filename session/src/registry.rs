use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use content::ContentKind;
use parking_lot::Mutex;
use tracing::debug;

use crate::model::{Session, SessionId, SessionKey, SessionState, SessionTiming};

/// Authoritative set of running sessions, at most one per key.
///
/// Every operation takes the lock for a single map access and never holds
/// it across an `.await`, so callers on any task can use it freely.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionKey, Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new running session for `key`.
    ///
    /// Returns `None` without touching the existing record when `key`
    /// already has a running session.
    pub fn try_start(
        &self,
        key: SessionKey,
        kind: ContentKind,
        timing: SessionTiming,
    ) -> Option<Session> {
        let mut guard = self.sessions.lock();

        match guard.entry(key) {
            Entry::Occupied(existing) => {
                debug!(
                    session_key = %existing.key(),
                    session_id = %existing.get().id,
                    "admission rejected; session already running"
                );
                None
            }
            Entry::Vacant(slot) => {
                let session = Session::start(slot.key().clone(), kind, timing);
                slot.insert(session.clone());
                Some(session)
            }
        }
    }

    pub fn is_running(&self, key: &SessionKey) -> bool {
        self.sessions.lock().contains_key(key)
    }

    /// Whether the running session for `key` is still instance `id`.
    pub fn is_current(&self, key: &SessionKey, id: SessionId) -> bool {
        self.sessions
            .lock()
            .get(key)
            .is_some_and(|s| s.id == id)
    }

    /// Snapshot of the running session for `key`.
    pub fn get(&self, key: &SessionKey) -> Option<Session> {
        self.sessions.lock().get(key).cloned()
    }

    /// Stop and evict the session for `key`.
    ///
    /// Stopping an unknown key is a no-op and returns `None`.
    pub fn stop(&self, key: &SessionKey) -> Option<Session> {
        let removed = self.sessions.lock().remove(key);
        removed.map(Self::retire)
    }

    /// Evict the session for `key` only if it is still instance `id`.
    ///
    /// Used by the tick loop when it exits (deadline or stop), so a loop that
    /// outlived its session can never evict a newer one.
    pub fn finish(&self, key: &SessionKey, id: SessionId) -> Option<Session> {
        let removed = {
            let mut guard = self.sessions.lock();
            match guard.get(key) {
                Some(s) if s.id == id => guard.remove(key),
                _ => None,
            }
        };
        removed.map(Self::retire)
    }

    /// Stop every running session. Used on shutdown.
    pub fn stop_all(&self) -> Vec<Session> {
        let drained: Vec<Session> = self.sessions.lock().drain().map(|(_, s)| s).collect();
        drained.into_iter().map(Self::retire).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    fn retire(mut session: Session) -> Session {
        session.state = SessionState::Stopped;
        session.cancel.cancel();
        session
    }
}
