pub mod adapters;
pub mod app;
pub mod config;
pub mod ports;
pub mod push;
pub mod state;
pub mod types;

use std::net::SocketAddr;

pub use app::app;

pub async fn serve(addr: SocketAddr, config: config::AppConfig) {
    let sender = adapters::FcmPushSender::new(config.fcm.clone())
        .expect("failed to build push gateway client");
    let store = adapters::FirestoreStore::new(config.firestore.clone(), config.schedule.utc_offset)
        .expect("failed to build document store client");

    // Keep the handle alive for the lifetime of the server; dropping it
    // aborts the daily loop.
    let _scheduler: push::SchedulerHandle = push::start_scheduler(
        adapters::TokioTimeProvider,
        store,
        sender.clone(),
        config.schedule,
    );

    let router = app::app(config, sender);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await.expect("server error");
}
