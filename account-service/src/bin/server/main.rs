use std::sync::Arc;

use account_service::config::Config;
use account_service::config::SessionStoreKind;
use account_service::config::StrategyKind;
use account_service::domain::auth::ports::AuthServicePort;
use account_service::domain::auth::ports::SessionManager;
use account_service::domain::auth::service::AuthService;
use account_service::domain::auth::session::MemorySessions;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::inbound::http::strategy::BasicAuthStrategy;
use account_service::inbound::http::strategy::RequestAuthenticator;
use account_service::inbound::http::strategy::SessionAuthStrategy;
use account_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        strategy = ?config.auth.strategy,
        session_store = ?config.auth.session_store,
        cookie_name = %config.auth.cookie_name,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database ready");

    let repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let service = Arc::new(AuthService::new(Arc::clone(&repository)));

    let sessions: Arc<dyn SessionManager> = match config.auth.session_store {
        SessionStoreKind::Persisted => Arc::clone(&service) as Arc<dyn SessionManager>,
        SessionStoreKind::Memory => Arc::new(MemorySessions::new(Arc::clone(&repository))),
    };

    let authenticator: Arc<dyn RequestAuthenticator> = match config.auth.strategy {
        StrategyKind::Session => Arc::new(SessionAuthStrategy::new(
            Arc::clone(&sessions),
            config.auth.cookie_name.clone(),
        )),
        StrategyKind::Basic => Arc::new(BasicAuthStrategy::new(
            Arc::clone(&service) as Arc<dyn AuthServicePort>
        )),
    };

    let state = AppState {
        service: service as Arc<dyn AuthServicePort>,
        sessions,
        authenticator,
        session_cookie: config.auth.cookie_name.clone(),
        excluded_paths: config.auth.excluded_paths.clone(),
    };

    let address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
