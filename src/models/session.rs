use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::identity::Identity;

/// Lifecycle of a session context: `Init -> Active -> Cleared`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nobody has signed in yet.
    Init,
    /// An identity is signed in.
    Active(Identity),
    /// The identity signed out.
    Cleared,
}

/// A login or registration attempt that has not finished yet.
#[derive(Debug, Clone)]
pub struct PendingAttempt {
    /// Sequence number of the attempt within its session.
    pub id: u64,
    /// Fires when the attempt is superseded or its view is dismissed.
    pub token: CancellationToken,
}

/// The single source of truth for who is signed in on one browser session.
#[derive(Debug)]
pub struct SessionContext {
    state: SessionState,
    csrf_token: Option<String>,
    pending: Option<PendingAttempt>,
    next_attempt: u64,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(lifetime: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            state: SessionState::Init,
            csrf_token: None,
            pending: None,
            next_attempt: 0,
            created_at: now,
            expires_at: now + lifetime,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Sets the current identity unconditionally.
    pub fn login(&mut self, identity: Identity) {
        self.state = SessionState::Active(identity);
    }

    /// Clears the current identity. Idempotent.
    pub fn logout(&mut self) {
        self.dismiss_pending();
        self.csrf_token = None;
        if matches!(self.state, SessionState::Active(_)) {
            self.state = SessionState::Cleared;
        }
    }

    pub fn current_identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Active(identity) => Some(identity),
            SessionState::Init | SessionState::Cleared => None,
        }
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn set_csrf_token(&mut self, token: String) {
        self.csrf_token = Some(token);
    }

    /// Starts a new attempt, cancelling any attempt still in flight.
    pub fn begin_attempt(&mut self) -> PendingAttempt {
        self.dismiss_pending();
        self.next_attempt += 1;
        let attempt = PendingAttempt {
            id: self.next_attempt,
            token: CancellationToken::new(),
        };
        self.pending = Some(attempt.clone());
        attempt
    }

    /// Signs `identity` in if attempt `attempt_id` is still the live one.
    ///
    /// Returns `false` (and leaves the state untouched) when the attempt was
    /// cancelled or superseded.
    pub fn complete_attempt(&mut self, attempt_id: u64, identity: Identity) -> bool {
        match self.pending.take() {
            Some(attempt) if attempt.id == attempt_id && !attempt.token.is_cancelled() => {
                self.login(identity);
                true
            }
            other => {
                self.pending = other.filter(|attempt| attempt.id != attempt_id);
                false
            }
        }
    }

    /// Forgets attempt `attempt_id` without signing anyone in.
    pub fn abandon_attempt(&mut self, attempt_id: u64) {
        if self.pending.as_ref().is_some_and(|attempt| attempt.id == attempt_id) {
            self.pending = None;
        }
    }

    /// Cancels the attempt in flight, if any.
    pub fn dismiss_pending(&mut self) {
        if let Some(attempt) = self.pending.take() {
            attempt.token.cancel();
        }
    }

    pub fn has_pending_attempt(&self) -> bool {
        self.pending.is_some()
    }

    /// Nobody is signed in and no attempt is in flight.
    pub fn is_idle(&self) -> bool {
        self.current_identity().is_none() && !self.has_pending_attempt()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Per-request snapshot of the session, inserted by the session middleware.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub identity: Option<Identity>,
}
