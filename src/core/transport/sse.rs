//! SSE session table.
//!
//! Each open event stream owns one session: a bounded channel whose
//! receiver feeds the stream and whose sender is kept in the table so the
//! message endpoint can push responses to it. Dropping the stream drops its
//! [`SessionGuard`], which removes the session.

use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::Event;
use dashmap::DashMap;
use futures::Stream;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{TransportError, TransportResult};

#[derive(Debug, Clone)]
struct SessionHandle {
    tx: mpsc::Sender<String>,
}

/// All open SSE sessions, keyed by session id.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionHandle>,
    capacity: usize,
}

impl SessionRegistry {
    /// Create a table whose sessions buffer up to `capacity` responses.
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Open a new session.
    pub fn open(self: &Arc<Self>) -> (SessionGuard, mpsc::Receiver<String>) {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(self.capacity);
        self.sessions.insert(id.clone(), SessionHandle { tx });
        info!(session_id = %id, "Opened SSE session");

        let guard = SessionGuard {
            id,
            registry: Arc::clone(self),
        };
        (guard, rx)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Push one message onto a session's stream.
    ///
    /// Waits while the session's buffer is full.
    pub async fn send(&self, id: &str, message: String) -> TransportResult<()> {
        let tx = self
            .sessions
            .get(id)
            .map(|handle| handle.tx.clone())
            .ok_or_else(|| TransportError::SessionNotFound(id.to_string()))?;

        tx.send(message)
            .await
            .map_err(|_| TransportError::SessionClosed(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn remove(&self, id: &str) {
        if self.sessions.remove(id).is_some() {
            info!(session_id = %id, "Closed SSE session");
        }
    }
}

/// Removes its session from the table when dropped.
#[derive(Debug)]
pub struct SessionGuard {
    id: String,
    registry: Arc<SessionRegistry>,
}

impl SessionGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}

/// The event stream of one session.
///
/// Starts with an `endpoint` event telling the client where to POST, then
/// yields one `message` event per pushed response.
pub fn session_stream(
    endpoint: String,
    guard: SessionGuard,
    mut rx: mpsc::Receiver<String>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let guard = guard;
        yield Ok(Event::default().event("endpoint").data(endpoint));

        while let Some(message) = rx.recv().await {
            debug!(session_id = %guard.id(), "Pushing SSE message");
            yield Ok(Event::default().event("message").data(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_send_reaches_receiver_in_order() {
        let registry = Arc::new(SessionRegistry::new(4));
        let (guard, mut rx) = registry.open();

        assert_ok!(registry.send(guard.id(), "first".to_string()).await);
        assert_ok!(registry.send(guard.id(), "second".to_string()).await);
        assert_eq!(rx.recv().await.as_deref(), Some("first"));
        assert_eq!(rx.recv().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let registry = SessionRegistry::new(4);
        let err = registry.send("missing", "x".to_string()).await.unwrap_err();
        assert!(matches!(err, TransportError::SessionNotFound(_)));
    }

    #[test]
    fn test_guard_drop_removes_session() {
        let registry = Arc::new(SessionRegistry::new(4));
        let (guard, _rx) = registry.open();
        let id = guard.id().to_string();
        assert!(registry.contains(&id));

        drop(guard);
        assert!(!registry.contains(&id));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dropping_stream_closes_session() {
        let registry = Arc::new(SessionRegistry::new(4));
        let (guard, rx) = registry.open();
        let id = guard.id().to_string();

        let mut stream = Box::pin(session_stream("/mcp/message".to_string(), guard, rx));
        assert!(stream.next().await.is_some());
        assert_eq!(registry.len(), 1);

        drop(stream);
        assert!(!registry.contains(&id));
    }
}
