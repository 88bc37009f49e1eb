use std::sync::Arc;

use panel_api::services::SqlxUserStore;
use panel_api::{app, config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting panel-api in {:?} mode", config.environment);

    let pool = db::connect(&config.database).await?;
    let state = AppState {
        users: Arc::new(SqlxUserStore::new(pool)),
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("panel-api listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
