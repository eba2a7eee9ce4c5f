use cinedex::{AppState, config::Config, db, store::MovieStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cinedex::init_tracing();

    let config = Config::from_env()?;

    let db = db::connect_and_migrate(config.database_url.as_str()).await?;
    let store = MovieStore::new(db);

    let app = cinedex::router(AppState { store: store.clone() });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    store.close().await?;
    tracing::info!("database connection closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
