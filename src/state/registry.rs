//! Registry of live WebSocket sessions
//!
//! Sessions are stored once, keyed by connection id, with a secondary
//! index from user id to the user's most recent connection. Both maps are
//! mutated under the same lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Association between a user and one live connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub connection_id: String,
}

/// Proof of registration, handed back to [`ConnectionRegistry::unregister`]
/// when the socket closes
#[derive(Debug)]
pub struct ConnectionHandle {
    session: Session,
}

impl ConnectionHandle {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user_id(&self) -> &str {
        &self.session.user_id
    }

    pub fn connection_id(&self) -> &str {
        &self.session.connection_id
    }
}

#[derive(Debug)]
struct ConnectionEntry {
    session: Session,
    outbound: UnboundedSender<String>,
    connected_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    connections: HashMap<String, ConnectionEntry>,
    by_user: HashMap<String, String>,
}

/// Thread-safe connection registry
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection for `user_id`
    ///
    /// A fresh connection id is assigned. If the user already has a live
    /// connection, the user index moves to the new one while the old
    /// connection stays registered until it disconnects.
    pub fn register(&self, user_id: String, outbound: UnboundedSender<String>) -> ConnectionHandle {
        let session = Session {
            user_id,
            connection_id: Uuid::new_v4().to_string(),
        };

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = inner
            .by_user
            .insert(session.user_id.clone(), session.connection_id.clone())
        {
            tracing::debug!(
                user_id = %session.user_id,
                previous = %previous,
                "User reconnected without disconnecting; index moved to new connection"
            );
        }
        inner.connections.insert(
            session.connection_id.clone(),
            ConnectionEntry {
                session: session.clone(),
                outbound,
                connected_at: Utc::now(),
            },
        );

        ConnectionHandle { session }
    }

    /// Remove a connection and, if it is still the user's current one, its
    /// user index entry
    ///
    /// # Returns
    /// When the connection was registered, or `None` if it was not
    pub fn unregister(&self, handle: ConnectionHandle) -> Option<DateTime<Utc>> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let removed = inner.connections.remove(handle.connection_id());

        let owns_index = inner
            .by_user
            .get(handle.user_id())
            .is_some_and(|current| current == handle.connection_id());
        if owns_index {
            inner.by_user.remove(handle.user_id());
        }

        removed.map(|entry| entry.connected_at)
    }

    /// Current session for `user_id`
    pub fn session_for_user(&self, user_id: &str) -> Option<Session> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .by_user
            .get(user_id)
            .and_then(|connection_id| inner.connections.get(connection_id))
            .map(|entry| entry.session.clone())
    }

    /// Queue `payload` on the user's current connection
    ///
    /// # Returns
    /// The session the payload was queued for, or `None` if the user has no
    /// live connection
    pub fn send_to_user(&self, user_id: &str, payload: String) -> Option<Session> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let entry = inner
            .by_user
            .get(user_id)
            .and_then(|connection_id| inner.connections.get(connection_id))?;

        match entry.outbound.send(payload) {
            Ok(()) => Some(entry.session.clone()),
            Err(_) => {
                tracing::debug!(connection_id = %entry.session.connection_id, "Outbound channel closed");
                None
            }
        }
    }

    /// Queue `payload` on every live connection
    ///
    /// # Returns
    /// Number of connections the payload was queued on
    pub fn broadcast(&self, payload: &str) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .connections
            .values()
            .filter(|entry| entry.outbound.send(payload.to_string()).is_ok())
            .count()
    }

    /// Debug view keyed by both connection id and user id
    ///
    /// Every connection appears under its connection id; each user index
    /// entry appears under the user id with the session it points at.
    pub fn snapshot(&self) -> BTreeMap<String, Session> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut view: BTreeMap<String, Session> = inner
            .connections
            .iter()
            .map(|(id, entry)| (id.clone(), entry.session.clone()))
            .collect();

        for (user_id, connection_id) in &inner.by_user {
            if let Some(entry) = inner.connections.get(connection_id) {
                view.insert(user_id.clone(), entry.session.clone());
            }
        }

        view
    }

    pub fn connection_count(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.connections.len()
    }

    pub fn user_count(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_user.len()
    }
}
