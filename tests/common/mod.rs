#![allow(dead_code)]

use std::time::Duration;

use blixora::{config::Config, router, state::AppState};
use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "admin@blixoralabs.dev";
pub const ADMIN_PASSWORD: &str = "admin123";

// Shared test context
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub state: AppState,
}

impl TestContext {
    /// Starts the app on an ephemeral port with no simulated auth latency.
    pub async fn spawn() -> Self {
        Self::spawn_with(Config {
            auth_delay: Duration::ZERO,
            ..Config::default()
        })
        .await
    }

    pub async fn spawn_with(config: Config) -> Self {
        Self::spawn_state(AppState::new(&config)).await
    }

    pub async fn spawn_state(state: AppState) -> Self {
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: Self::new_client(),
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// A browser-like client: keeps cookies, does not follow redirects.
    pub fn new_client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert_eq!(response.status().as_u16(), 200, "GET {} failed", path);
        response.json().await.unwrap()
    }

    /// Signs in and returns the CSRF token issued with the session.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200, "Login failed");
        csrf_from(&response)
    }

    pub async fn login_admin(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }
}

pub fn csrf_from(response: &reqwest::Response) -> String {
    response
        .cookies()
        .find(|c| c.name() == "csrf_token")
        .expect("CSRF token not found in response")
        .value()
        .to_string()
}

pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
