use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// The simulated latency of the authenticator.
    pub auth_delay: Duration,
    /// The email address of the demo administrator.
    pub demo_admin_email: String,
    /// The password of the demo administrator.
    pub demo_admin_password: Zeroizing<String>,
    /// The origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// The directory served for unmatched paths.
    pub public_dir: String,
    /// Whether the application runs in production (enables secure cookies).
    pub production: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            session_duration_days: 7,
            auth_delay: Duration::from_millis(1000),
            demo_admin_email: "admin@blixoralabs.dev".to_string(),
            demo_admin_password: Zeroizing::new("admin123".to_string()),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://[::1]:3000".to_string(),
            ],
            public_dir: "public".to_string(),
            production: false,
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// Every variable is optional; unset variables keep the development
    /// defaults of [`Config::default`].
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(addr) => addr.parse().context("BIND_ADDR must be a socket address (e.g. 127.0.0.1:3000)")?,
            Err(_) => defaults.bind_addr,
        };

        let session_duration_days = match env::var("SESSION_DURATION_DAYS") {
            Ok(raw) => parse_session_days(&raw)?,
            Err(_) => defaults.session_duration_days,
        };

        let auth_delay_ms: u64 = env::var("AUTH_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .context("Invalid AUTH_DELAY_MS")?;

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => defaults.cors_origins,
        };

        Ok(Self {
            bind_addr,
            session_duration_days,
            auth_delay: Duration::from_millis(auth_delay_ms),
            demo_admin_email: env::var("DEMO_ADMIN_EMAIL")
                .unwrap_or(defaults.demo_admin_email),
            demo_admin_password: match env::var("DEMO_ADMIN_PASSWORD") {
                Ok(password) => Zeroizing::new(password),
                Err(_) => defaults.demo_admin_password,
            },
            cors_origins,
            public_dir: env::var("PUBLIC_DIR").unwrap_or(defaults.public_dir),
            production: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                == "production",
        })
    }

    /// The lifetime of a session context.
    pub fn session_duration(&self) -> chrono::Duration {
        chrono::Duration::days(self.session_duration_days)
    }
}

/// Longest accepted session lifetime, in days.
const MAX_SESSION_DURATION_DAYS: i64 = 365;

/// Parses `SESSION_DURATION_DAYS`, accepting `1..=365`.
fn parse_session_days(raw: &str) -> Result<i64> {
    let days: i64 = raw.trim().parse().context("Invalid SESSION_DURATION_DAYS")?;

    if !(1..=MAX_SESSION_DURATION_DAYS).contains(&days) {
        anyhow::bail!(
            "SESSION_DURATION_DAYS must be between 1 and {}",
            MAX_SESSION_DURATION_DAYS
        );
    }

    Ok(days)
}

/// Splits a comma separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
