use std::sync::Arc;

use crate::config::Config;
use crate::repositories::{
    catalog::CatalogStore,
    enrollment::EnrollmentBook,
    session::SessionRegistry,
};
use crate::services::auth::{Authenticator, DemoAuthenticator};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// Session contexts keyed by cookie.
    pub sessions: SessionRegistry,
    /// The simulation catalog.
    pub catalog: CatalogStore,
    /// Learner enrollments.
    pub enrollments: EnrollmentBook,
    /// The pluggable credential check.
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Creates a new `AppState` backed by the demo authenticator and the
    /// seeded catalog.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    pub fn new(config: &Config) -> Self {
        let authenticator = DemoAuthenticator::new(
            &config.demo_admin_email,
            config.demo_admin_password.clone(),
        );
        Self::with_authenticator(config, Arc::new(authenticator))
    }

    /// Creates a new `AppState` around a custom authenticator.
    pub fn with_authenticator(config: &Config, authenticator: Arc<dyn Authenticator>) -> Self {
        let sessions = SessionRegistry::new(config.session_duration());
        tracing::info!("✅ Session registry initialized");

        let catalog = CatalogStore::seeded();
        tracing::info!("✅ Catalog seeded");

        Self {
            config: config.clone(),
            sessions,
            catalog,
            enrollments: EnrollmentBook::new(),
            authenticator,
        }
    }
}
