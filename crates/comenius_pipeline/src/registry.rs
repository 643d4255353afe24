//! Session liveness tracking for cooperative cancellation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared map of session id to liveness flag.
///
/// The pipeline registers a session when a run starts and removes it
/// after the terminal event.  [`stop`](SessionRegistry::stop) flips the
/// flag from any task holding a clone; the run observes the flip at its
/// next unit boundary.  The lock is never held across an await.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<String, bool>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session as live.  Returns false if a live session
    /// with this id already exists.
    pub fn start(&self, session_id: &str) -> bool {
        let mut sessions = self.lock();
        if sessions.get(session_id).copied().unwrap_or(false) {
            return false;
        }
        sessions.insert(session_id.to_owned(), true);
        true
    }

    /// Whether the session is registered and still live.
    pub fn is_live(&self, session_id: &str) -> bool {
        self.lock().get(session_id).copied().unwrap_or(false)
    }

    /// Flags a live session for cancellation.
    ///
    /// Returns true when a live session was found and flagged, false
    /// when the id is unknown or the session already stopped.
    pub fn stop(&self, session_id: &str) -> bool {
        let mut sessions = self.lock();
        match sessions.get_mut(session_id) {
            Some(live) if *live => {
                *live = false;
                true
            }
            _ => false,
        }
    }

    /// Drops a session entry entirely.  Called after the terminal
    /// event so stale ids do not accumulate.
    pub fn remove(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    /// Number of registered sessions, live or flagged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, bool>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
