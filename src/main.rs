//! Temperature Monitor Server - Binary Entry Point

use std::env;

use temp_monitor::api::http::create_router;
use temp_monitor::broadcast::init_registry;
use temp_monitor::types::MonitorResult;

#[tokio::main]
async fn main() -> MonitorResult<()> {
    let registry = init_registry();
    let app = create_router(registry);

    let addr = env::var("TEMP_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("[Server] listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    eprintln!("[Server] shutting down");
}
