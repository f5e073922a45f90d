//! HTTP server lifecycle.

// crates.io
use tokio::net::TcpListener;
// self
use crate::{_prelude::*, api, config::RelayConfig, error::TransportError, relay::Relay};

/// Binds the configured address and serves the relay until Ctrl-C.
pub async fn serve(config: &RelayConfig) -> Result<()> {
	let relay = config.relay()?;
	let listener = TcpListener::bind(config.bind).await.map_err(TransportError::Io)?;

	serve_listener(listener, relay, config.max_upload_bytes, shutdown_signal()).await
}

/// Serves the relay on an already bound listener until `shutdown` resolves.
pub async fn serve_listener<F>(
	listener: TcpListener,
	relay: Relay,
	max_upload_bytes: usize,
	shutdown: F,
) -> Result<()>
where
	F: 'static + Send + Future<Output = ()>,
{
	let addr = listener.local_addr().map_err(TransportError::Io)?;

	tracing::info!(%addr, api_base = %relay.descriptor.endpoints.api_base, "relay listening");

	axum::serve(listener, api::router(relay, max_upload_bytes))
		.with_graceful_shutdown(shutdown)
		.await
		.map_err(TransportError::Io)?;

	tracing::info!("relay stopped");

	Ok(())
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("shutdown signal received"),
		Err(err) => {
			tracing::error!(error = %err, "failed to listen for shutdown signal");

			std::future::pending::<()>().await;
		},
	}
}
