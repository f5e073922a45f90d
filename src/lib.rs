//! Token-aware HTTP relay for the Zoho Recruit API: lazy OAuth refresh, a single authorized
//! retry on expired tokens, and transport-aware observability behind a small axum surface.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod relay;
pub mod server;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::TokenSecret,
		http::ReqwestHttpClient,
		provider::{DefaultProviderStrategy, ProviderDescriptor, ProviderStrategy},
		relay::{Relay, RelayCredentials},
	};

	/// Client identifier used by test relays.
	pub const TEST_CLIENT_ID: &str = "relay-client";
	/// Client secret used by test relays.
	pub const TEST_CLIENT_SECRET: &str = "relay-secret";
	/// Refresh token used by test relays.
	pub const TEST_REFRESH_TOKEN: &str = "relay-refresh";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a descriptor whose token endpoint is `{base}/oauth/v2/token` and whose API base
	/// is `{base}/recruit/v2`.
	pub fn test_descriptor(base_url: &str) -> ProviderDescriptor {
		let base = base_url.trim_end_matches('/');

		ProviderDescriptor::builder()
			.token_endpoint(
				Url::parse(&format!("{base}/oauth/v2/token"))
					.expect("Mock token endpoint should parse successfully."),
			)
			.api_base(
				Url::parse(&format!("{base}/recruit/v2"))
					.expect("Mock API base should parse successfully."),
			)
			.build()
			.expect("Provider descriptor should build successfully.")
	}

	/// Constructs a [`Relay`] pointed at a mock upstream rooted at `base_url`.
	pub fn build_reqwest_test_relay(base_url: &str) -> Relay {
		let credentials = RelayCredentials::new(
			TEST_CLIENT_ID,
			TokenSecret::new(TEST_CLIENT_SECRET),
			TokenSecret::new(TEST_REFRESH_TOKEN),
		);
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(DefaultProviderStrategy);

		Relay::with_http_client(
			test_descriptor(base_url),
			credentials,
			strategy,
			test_reqwest_http_client(),
		)
	}

	/// Token endpoint body carrying the provided access token.
	pub fn token_body(access_token: &str) -> String {
		format!(
			"{{\"access_token\":\"{access_token}\",\"api_domain\":\"https://www.zohoapis.com\",\"token_type\":\"Bearer\",\"expires_in\":3600}}"
		)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use bytes::Bytes;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

// Used by the `recruit-relay` binary.
use color_eyre as _;
pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tower as _};
