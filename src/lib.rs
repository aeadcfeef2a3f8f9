pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, Router};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use modules::auth::{auth_routes, AuthActions, SessionStateStore};
use modules::console::console_routes;
use modules::dashboard::dashboard_routes;
use modules::metrics::metrics_routes;
use modules::users::{user_routes, UserOperations};
use services::backend::Backend;
use services::clock::Clock;
use services::context::ConsoleContext;
use services::i18n::{Language, Translator};
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::notifier::{NoticeLog, RouteTracker};
use services::persistence::{PersistedSession, StatePersistence};
use services::query_cache::QueryCache;
use services::rate_limit::{create_login_limiter, LoginRateLimiter};
use services::security::console_headers;

/// Runtime knobs that do not come from the backend.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleOptions {
    pub language: Language,
    pub login_burst: u32,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            language: Language::En,
            login_burst: config::environment::DEFAULT_LOGIN_BURST,
        }
    }
}

pub struct AppState {
    pub context: ConsoleContext,
    pub session: Arc<SessionStateStore>,
    pub auth: AuthActions,
    pub users: UserOperations,
    pub notices: Arc<NoticeLog>,
    pub login_limiter: LoginRateLimiter,
    pub listener: JoinHandle<()>,
}

/// Wires the console around `backend`, starts the auth listener and
/// resolves the startup session before returning.
pub async fn start_console(
    backend: Arc<dyn Backend>,
    storage: Arc<dyn StatePersistence>,
    clock: Arc<dyn Clock>,
    options: ConsoleOptions,
) -> Result<Arc<AppState>, Box<dyn std::error::Error>> {
    let notices = Arc::new(NoticeLog::default());
    let context = ConsoleContext {
        backend,
        persisted: Arc::new(PersistedSession::new(storage)),
        notifier: notices.clone(),
        navigator: Arc::new(RouteTracker::default()),
        translator: Translator::new(options.language),
        clock,
        metrics: MetricsRegistry::new()?,
    };

    let session = Arc::new(SessionStateStore::new(context.clone()));
    let listener = session.spawn_listener();
    session.initialize().await;

    let auth = AuthActions::new(context.clone(), session.clone());
    let users = UserOperations::new(context.clone(), session.clone(), Arc::new(QueryCache::new()));

    Ok(Arc::new(AppState {
        context,
        session,
        auth,
        users,
        notices,
        login_limiter: create_login_limiter(options.login_burst),
        listener,
    }))
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(console_routes())
        .merge(metrics_routes())
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/dashboard", dashboard_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn_with_state(
                    state.context.metrics.clone(),
                    metrics_middleware,
                ))
                .layer(middleware::from_fn(console_headers))
                .layer(RequestBodyLimitLayer::new(1024 * 64)), // 64KB max body
        )
        .with_state(state)
}
