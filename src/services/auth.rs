use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use subtle::ConstantTimeEq;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::{AppError, Result};
use crate::models::identity::{Identity, Role};

/// Name given to identities created by a bare login.
const DEFAULT_USER_NAME: &str = "Test User";
/// Name of the configured administrator.
const ADMIN_NAME: &str = "Admin User";

/// Errors raised by an [`Authenticator`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Authenticator unavailable: {0}")]
    Unavailable(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Authentication(err.to_string()),
            AuthError::EmailTaken => AppError::Conflict(err.to_string()),
            AuthError::Unavailable(msg) => AppError::Internal(msg),
        }
    }
}

/// Email + password as typed into the login form.
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

/// A validated registration.
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

/// Turns credentials into an identity. The seam for a real backend.
pub trait Authenticator: Send + Sync {
    /// Resolves credentials to the identity they belong to.
    fn authenticate(&self, credentials: &Credentials) -> std::result::Result<Identity, AuthError>;

    /// Creates a new identity with role `user`.
    fn register(&self, registration: &Registration) -> std::result::Result<Identity, AuthError>;

    /// Every identity known to the authenticator, oldest first.
    fn identities(&self) -> std::result::Result<Vec<Identity>, AuthError>;

    /// Forgets a registered user, undoing a registration that never reached
    /// its session. Administrators are never removed.
    fn revoke(&self, identity_id: Uuid) -> std::result::Result<(), AuthError>;
}

/// Directory key: the same email may name both the administrator and a user.
type DirectoryKey = (Role, String);

/// In-memory authenticator standing in for the platform backend.
///
/// The configured administrator signs in with the configured password. Any
/// other non-empty email/password pair is accepted as a plain user, including
/// the administrator's email with a different password.
pub struct DemoAuthenticator {
    admin_email: String,
    admin_password: Zeroizing<String>,
    directory: Mutex<HashMap<DirectoryKey, Identity>>,
}

impl DemoAuthenticator {
    pub fn new(admin_email: &str, admin_password: Zeroizing<String>) -> Self {
        let admin_email = normalize_email(admin_email);
        let admin = Identity::new(ADMIN_NAME, admin_email.clone(), Role::Admin);

        let mut directory = HashMap::new();
        directory.insert((Role::Admin, admin_email.clone()), admin);

        Self {
            admin_email,
            admin_password,
            directory: Mutex::new(directory),
        }
    }

    fn directory(
        &self,
    ) -> std::result::Result<std::sync::MutexGuard<'_, HashMap<DirectoryKey, Identity>>, AuthError> {
        self.directory
            .lock()
            .map_err(|_| AuthError::Unavailable("identity directory lock poisoned".to_string()))
    }
}

impl Authenticator for DemoAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> std::result::Result<Identity, AuthError> {
        let email = normalize_email(&credentials.email);
        if email.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let mut directory = self.directory()?;

        let is_admin = email == self.admin_email && {
            let matches: bool = credentials
                .password
                .as_bytes()
                .ct_eq(self.admin_password.as_bytes())
                .into();
            if !matches {
                tracing::debug!("Administrator email without its password, signing in as user");
            }
            matches
        };

        let role = if is_admin { Role::Admin } else { Role::User };
        let identity = directory
            .entry((role, email.clone()))
            .or_insert_with(|| Identity::new(DEFAULT_USER_NAME, email, Role::User))
            .clone();

        tracing::debug!("🔐 Authenticated {} as {}", identity.id, identity.role);
        Ok(identity)
    }

    fn register(&self, registration: &Registration) -> std::result::Result<Identity, AuthError> {
        let email = normalize_email(&registration.email);
        let mut directory = self.directory()?;

        if email == self.admin_email || directory.contains_key(&(Role::User, email.clone())) {
            return Err(AuthError::EmailTaken);
        }

        let identity = Identity::new(registration.name.trim(), email.clone(), Role::User);
        directory.insert((Role::User, email), identity.clone());

        tracing::info!("✅ Identity registered: {}", identity.id);
        Ok(identity)
    }

    fn identities(&self) -> std::result::Result<Vec<Identity>, AuthError> {
        let directory = self.directory()?;
        let mut identities: Vec<Identity> = directory.values().cloned().collect();
        identities.sort_by_key(|identity| identity.created_at);
        Ok(identities)
    }

    fn revoke(&self, identity_id: Uuid) -> std::result::Result<(), AuthError> {
        let mut directory = self.directory()?;
        directory.retain(|(role, _), identity| *role == Role::Admin || identity.id != identity_id);
        tracing::info!("↩️ Identity revoked: {}", identity_id);
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Runs an authenticator call behind the simulated latency.
///
/// Resolves to [`AppError::Cancelled`] as soon as `token` fires, without
/// running `call`.
pub async fn run_attempt<F>(delay: Duration, token: CancellationToken, call: F) -> Result<Identity>
where
    F: FnOnce() -> std::result::Result<Identity, AuthError>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled),
        _ = tokio::time::sleep(delay) => call().map_err(AppError::from),
    }
}
