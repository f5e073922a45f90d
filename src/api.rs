//! Inbound HTTP surface: one route per relay operation.
//!
//! Handlers only translate between HTTP and [`Relay`] calls. Every failure is rendered as
//! `{ "error": <operation summary>, "details": <error message> }` with status 400 for caller
//! mistakes and 500 for everything else.

mod error;
mod handlers;

pub use error::*;

// crates.io
use axum::{
	Router,
	extract::DefaultBodyLimit,
	routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
// self
use crate::relay::Relay;

/// Default cap for inbound request bodies, photo uploads included.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builds the relay router with permissive CORS, request tracing, and a body size cap.
pub fn router(relay: Relay, max_upload_bytes: usize) -> Router {
	Router::new()
		.route("/fetch-candidate", get(handlers::fetch_candidate))
		.route("/create-candidate", post(handlers::create_candidate))
		.route("/update-candidate", put(handlers::update_candidate))
		.route("/download-photo", get(handlers::download_photo))
		.route("/upload-photo", post(handlers::upload_photo))
		.route("/create-job-opening", post(handlers::create_job_opening))
		.route("/fetch-job-opening", get(handlers::fetch_job_opening))
		.route("/associate-candidate", put(handlers::associate_candidate))
		.route("/fetch-related-applications", get(handlers::fetch_related_applications))
		.route("/update-application", put(handlers::update_application))
		.layer(DefaultBodyLimit::max(max_upload_bytes))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(relay)
}
