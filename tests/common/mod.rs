use axum_test::{TestResponse, TestServer};
use serde_json::json;
use std::sync::Arc;

use license_admin::modules::users::model::User;
use license_admin::services::backend::InMemoryBackend;
use license_admin::services::clock::FixedClock;
use license_admin::services::persistence::MemoryStatePersistence;
use license_admin::{AppState, ConsoleOptions};

pub const ADMIN_ID: &str = "admin-1";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "AdminPass1";

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub backend: Arc<InMemoryBackend>,
    pub clock: Arc<FixedClock>,
}

#[allow(dead_code)]
impl TestContext {
    /// Console on 2025-06-15 with one admin account (no second factor).
    pub async fn new() -> Self {
        Self::with_admin(admin()).await
    }

    pub async fn with_admin(admin: User) -> Self {
        Self::build(admin, 100).await
    }

    pub async fn with_login_burst(burst: u32) -> Self {
        Self::build(admin(), burst).await
    }

    /// Same as [`TestContext::new`], already logged in.
    pub async fn signed_in() -> Self {
        let ctx = Self::new().await;
        ctx.login().await.assert_status_ok();
        assert!(ctx.state.session.is_authenticated());
        ctx
    }

    async fn build(admin: User, login_burst: u32) -> Self {
        let clock = Arc::new(FixedClock::on(2025, 6, 15));
        let backend = Arc::new(InMemoryBackend::new(clock.clone()));
        backend.seed_user(admin, ADMIN_PASSWORD).await;

        let state = license_admin::start_console(
            backend.clone(),
            Arc::new(MemoryStatePersistence::new()),
            clock.clone(),
            ConsoleOptions {
                login_burst,
                ..Default::default()
            },
        )
        .await
        .expect("Failed to start console");

        let app = license_admin::create_app(state.clone());
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            state,
            backend,
            clock,
        }
    }

    pub async fn login(&self) -> TestResponse {
        self.server
            .post("/auth/login")
            .json(&json!({
                "email": ADMIN_EMAIL,
                "password": ADMIN_PASSWORD
            }))
            .await
    }

    /// Notice titles raised so far, oldest first. Drains the log.
    pub fn notice_titles(&self) -> Vec<String> {
        self.state.notices.drain().into_iter().map(|n| n.title).collect()
    }
}

#[allow(dead_code)]
pub fn admin() -> User {
    User {
        id: ADMIN_ID.to_string(),
        uid: Some(ADMIN_ID.to_string()),
        name: Some("Console Admin".to_string()),
        email: ADMIN_EMAIL.to_string(),
        email_type: Some("Admin".to_string()),
        block: Some("Not Blocked".to_string()),
        two_factor_enabled: Some(false),
        ..Default::default()
    }
}

/// A licensed customer row as the console would have created it.
#[allow(dead_code)]
pub fn customer(id: &str) -> User {
    User {
        id: id.to_string(),
        uid: Some(id.to_string()),
        name: Some("Customer".to_string()),
        email: format!("{}@example.com", id),
        password: Some("secret1".to_string()),
        credits: Some("10.0".to_string()),
        user_type: Some("Credits License".to_string()),
        phone: Some("+966500000000".to_string()),
        country: Some("Saudi Arabia".to_string()),
        block: Some("Not Blocked".to_string()),
        activate: Some("Active".to_string()),
        email_type: Some("User".to_string()),
        ..Default::default()
    }
}

// Helper to generate unique test email
#[allow(dead_code)]
pub fn test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}
