use std::sync::Arc;

use license_admin::config::Config;
use license_admin::services::backend::SupabaseClient;
use license_admin::services::clock::SystemClock;
use license_admin::services::persistence::FileStatePersistence;
use license_admin::ConsoleOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "license_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let backend = Arc::new(SupabaseClient::new(config.supabase.clone()));
    tracing::info!("Using Supabase project at {}", config.supabase.url);

    let storage = Arc::new(FileStatePersistence::new(config.state_file.clone()));
    tracing::info!("Persisting console auth state to {}", config.state_file.display());

    let state = license_admin::start_console(
        backend,
        storage,
        Arc::new(SystemClock),
        ConsoleOptions {
            language: config.language,
            login_burst: config.login_burst,
        },
    )
    .await
    .expect("Failed to start console");

    let app = license_admin::create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await.unwrap();
    tracing::info!("Admin console running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.unwrap();
}
