use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use six_bridge::{api, AppState, Config, Database};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let database = Database::new(&config.ruta_db)?;
    database.asegurar_admin(&config.admin_email, &config.admin_password)?;

    let state = Arc::new(AppState::new(database));
    let app = api::crear_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.puerto));
    tracing::info!("six-bridge escuchando en {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
