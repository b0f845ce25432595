use snapfeed::{config::AuthConfig, db, routes, state::AppState, utils::storage::PhotoStore};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load .env file immediately
    // Uses dotenvy which is just dotenv but maintained. Silently ignores if no .env exists.
    dotenvy::dotenv().ok();

    // 1. Install rustls crypto provider
    // Needs to happen before any TLS connection is made (the database, mainly).
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // 2. Initialize logging
    // Structured logs via tracing. Respects RUST_LOG.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapfeed=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting snapfeed...");

    // 3. Load the signing configuration
    // ALGORITHM / SECRET_KEY / ACCESS_TOKEN_EXPIRE_MINUTES. All required;
    // a server that can't verify its own tokens has no business starting.
    let auth = AuthConfig::from_env()?;

    // 4. Connect to the database and ensure the schema
    let db = db::connect().await?;
    tracing::info!("Connected to Postgres");

    // 5. Initialize photo storage
    let photos = PhotoStore::from_env()?;
    tracing::info!("Photo storage initialized");

    // 6. Build the app state and router
    let state = AppState { db, auth, photos };
    let app = routes::create_routes(state);

    // 7. Start the server
    // Listens on PORT (defaults to 3000), all interfaces.
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = SocketAddr::from(([0, 0, 0, 0], port.parse()?));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
