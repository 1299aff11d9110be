use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        identity::Identity,
        session::{CurrentSession, PendingAttempt, SessionContext},
    },
};

/// In-memory registry of session contexts keyed by the `session_id` cookie.
///
/// A context is only stored once a login or registration attempt begins;
/// anonymous browsing never grows the registry. Contexts that fall back to
/// idle (nobody signed in, nothing pending) are dropped.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionContext>>>,
    lifetime: chrono::Duration,
}

impl SessionRegistry {
    pub fn new(lifetime: chrono::Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            lifetime,
        }
    }

    /// Resolves the session named by the cookie.
    ///
    /// An unknown id stays in use as an anonymous session. A missing or
    /// expired one is replaced by a fresh id. Nothing is stored here.
    ///
    /// Returns the snapshot and whether a new id was issued.
    pub async fn resolve(&self, session_id: Option<Uuid>) -> (CurrentSession, bool) {
        if let Some(id) = session_id {
            let now = Utc::now();
            let mut sessions = self.sessions.write().await;
            match sessions.get(&id) {
                Some(context) if !context.is_expired(now) => {
                    return (
                        CurrentSession {
                            id,
                            identity: context.current_identity().cloned(),
                        },
                        false,
                    );
                }
                Some(_) => {
                    tracing::info!("⌛ Session expired: {}", id);
                    sessions.remove(&id);
                }
                None => return (CurrentSession { id, identity: None }, false),
            }
        }

        let id = Uuid::new_v4();
        tracing::debug!("🆕 Session id issued: {}", id);

        (CurrentSession { id, identity: None }, true)
    }

    pub async fn current_identity(&self, session_id: Uuid) -> Option<Identity> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .and_then(|context| context.current_identity().cloned())
    }

    /// Starts a login/registration attempt, cancelling the previous one.
    /// Stores the context if this session had none yet.
    pub async fn begin_attempt(&self, session_id: Uuid) -> PendingAttempt {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| SessionContext::new(self.lifetime))
            .begin_attempt()
    }

    /// Signs `identity` in if the attempt is still live and stores `csrf_token`.
    ///
    /// The context moves to a freshly generated id, which is returned; the id
    /// the browser held while anonymous no longer names it.
    pub async fn complete_attempt(
        &self,
        session_id: Uuid,
        attempt_id: u64,
        identity: Identity,
        csrf_token: String,
    ) -> Result<Uuid> {
        let mut sessions = self.sessions.write().await;
        let mut context = sessions.remove(&session_id).ok_or(AppError::Cancelled)?;

        if !context.complete_attempt(attempt_id, identity) {
            if !context.is_idle() {
                sessions.insert(session_id, context);
            }
            return Err(AppError::Cancelled);
        }

        context.set_csrf_token(csrf_token);
        let rotated = Uuid::new_v4();
        sessions.insert(rotated, context);
        tracing::debug!("🔄 Session {} rotated to {}", session_id, rotated);

        Ok(rotated)
    }

    pub async fn abandon_attempt(&self, session_id: Uuid, attempt_id: u64) {
        let mut sessions = self.sessions.write().await;
        if let Some(context) = sessions.get_mut(&session_id) {
            context.abandon_attempt(attempt_id);
        }
        Self::drop_if_idle(&mut sessions, session_id);
    }

    /// Cancels the attempt in flight for this session, if any.
    pub async fn dismiss_pending(&self, session_id: Uuid) {
        let mut sessions = self.sessions.write().await;
        if let Some(context) = sessions.get_mut(&session_id) {
            if context.has_pending_attempt() {
                tracing::info!("🚫 Pending login attempt dismissed for session {}", session_id);
                context.dismiss_pending();
            }
        }
        Self::drop_if_idle(&mut sessions, session_id);
    }

    /// Clears the identity of this session. Idempotent.
    pub async fn logout(&self, session_id: Uuid) {
        let mut sessions = self.sessions.write().await;
        if let Some(context) = sessions.get_mut(&session_id) {
            context.logout();
        }
        Self::drop_if_idle(&mut sessions, session_id);
    }

    pub async fn csrf_token(&self, session_id: Uuid) -> Option<String> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .and_then(|context| context.csrf_token().map(str::to_string))
    }

    /// Drops every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, context| !context.is_expired(now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn drop_if_idle(sessions: &mut HashMap<Uuid, SessionContext>, session_id: Uuid) {
        if sessions.get(&session_id).is_some_and(SessionContext::is_idle) {
            sessions.remove(&session_id);
        }
    }
}
