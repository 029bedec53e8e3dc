use mistake_journal::{router, timer::now_ms, AppState, Config, Journal, SnapshotFile};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let snapshot_file = config.data_path.clone().map(SnapshotFile::new);
    let snapshot = match &snapshot_file {
        Some(file) => {
            info!(path = %file.path().display(), "loading journal snapshot");
            file.load().await
        }
        None => {
            info!("no JOURNAL_DATA_PATH set, records are kept in memory only");
            Default::default()
        }
    };

    let journal = Journal::from_snapshot(snapshot, now_ms());
    let state = AppState::new(journal, snapshot_file, config.theme);
    let app = router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(theme = config.theme.id, "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.stop_ticker().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
