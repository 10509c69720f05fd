use habit_tracker::clock::SystemClock;
use habit_tracker::scheduler::{spawn_daily_evaluator, spawn_reminder_scanner};
use habit_tracker::{router, AppState, Config, Storage, Tracker};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let storage = Storage::new(&config.data_dir);
    storage.ensure_dir().await?;

    let tracker = Tracker::open(storage, Arc::new(SystemClock), config.policy.clone()).await;
    let state = AppState::new(tracker);

    let reminders = spawn_reminder_scanner(state.clone());
    let evaluator = spawn_daily_evaluator(state.clone());

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reminders.abort();
    evaluator.abort();
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
