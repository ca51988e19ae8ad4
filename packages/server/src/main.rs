use std::sync::Arc;

use tracing::{Level, info};

use mediaboard::config::AppConfig;
use mediaboard::state::AppState;
use mediaboard::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;
    let db = database::init_db(&config.database.url).await?;
    seed::ensure_indexes(&db).await?;
    seed::ensure_sensitive_tag(&db, &config.catalog.sensitive_tag).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
