// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use recruit_relay::{
	_preludet::*,
	auth::{TokenSecret, TokenState},
	error::UpstreamError,
	relay::CandidateLookup,
};

const SEARCH_PATH: &str = "/recruit/v2/Candidates/search";

fn email_lookup() -> CandidateLookup {
	CandidateLookup::Email("a@b.com".into())
}

fn invalid_token_body() -> JsonValue {
	json!({
		"code": "INVALID_TOKEN",
		"details": {},
		"message": "invalid oauth token",
		"status": "error"
	})
}

#[tokio::test]
async fn first_call_refreshes_once_and_reuses_token() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/v2/token")
				.body_includes("grant_type=refresh_token")
				.body_includes("refresh_token=relay-refresh")
				.body_includes("client_id=relay-client");
			then.status(200).header("content-type", "application/json").body(token_body("access-1"));
		})
		.await;
	let search = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(SEARCH_PATH)
				.query_param("email", "a@b.com")
				.header("authorization", "Zoho-oauthtoken access-1");
			then.status(200).json_body(json!({ "data": [{ "id": "1", "Email": "a@b.com" }] }));
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());

	assert_eq!(relay.tokens().state(), TokenState::Absent);

	let first = relay.fetch_candidate(email_lookup()).await.expect("First lookup should succeed.");
	let second = relay.fetch_candidate(email_lookup()).await.expect("Second lookup should succeed.");

	assert_eq!(first, json!({ "data": [{ "id": "1", "Email": "a@b.com" }] }));
	assert_eq!(first, second);
	assert_eq!(relay.tokens().state(), TokenState::Valid);
	assert_eq!(relay.tokens().metrics().endpoint_calls(), 1);

	token.assert_calls_async(1).await;
	search.assert_calls_async(2).await;
}

#[tokio::test]
async fn cached_token_skips_the_token_endpoint() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/token");
			then.status(200).header("content-type", "application/json").body(token_body("unused"));
		})
		.await;
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH).header("authorization", "Zoho-oauthtoken seeded");
			then.status(204);
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());

	relay.tokens().seed(TokenSecret::new("seeded"));

	let result = relay.fetch_candidate(email_lookup()).await.expect("Lookup should succeed.");

	assert_eq!(result, JsonValue::Null);

	token.assert_calls_async(0).await;
	search.assert_calls_async(1).await;
}

#[tokio::test]
async fn expired_token_is_refreshed_and_retried_exactly_once() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/token");
			then.status(200).header("content-type", "application/json").body(token_body("fresh"));
		})
		.await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH).header("authorization", "Zoho-oauthtoken stale");
			then.status(401).json_body(invalid_token_body());
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH).header("authorization", "Zoho-oauthtoken fresh");
			then.status(200).json_body(json!({ "data": [{ "id": "7" }] }));
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());
	let stale = relay.tokens().seed(TokenSecret::new("stale"));
	let result = relay.fetch_candidate(email_lookup()).await.expect("Retried lookup should succeed.");

	assert_eq!(result, json!({ "data": [{ "id": "7" }] }));

	let current = relay.tokens().current().expect("Fresh token should be cached.");

	assert_eq!(current.secret().expose(), "fresh");
	assert!(current.generation() > stale.generation());

	token.assert_calls_async(1).await;
	rejected.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;
}

#[tokio::test]
async fn second_rejection_is_surfaced_without_another_retry() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/token");
			then.status(200).header("content-type", "application/json").body(token_body("also-bad"));
		})
		.await;
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH);
			then.status(401).json_body(invalid_token_body());
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());

	relay.tokens().seed(TokenSecret::new("bad"));

	let err = relay
		.fetch_candidate(email_lookup())
		.await
		.expect_err("A second token rejection should fail the call.");

	assert!(err.is_auth_expired());
	assert!(!err.is_client_input());

	token.assert_calls_async(1).await;
	search.assert_calls_async(2).await;
}

#[tokio::test]
async fn non_token_failures_are_not_retried() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/token");
			then.status(200).header("content-type", "application/json").body(token_body("unused"));
		})
		.await;
	let unauthorized = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH);
			then.status(401).json_body(json!({
				"code": "OAUTH_SCOPE_MISMATCH",
				"message": "invalid oauth scope to access this URL"
			}));
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());

	relay.tokens().seed(TokenSecret::new("scoped"));

	let err = relay
		.fetch_candidate(email_lookup())
		.await
		.expect_err("Scope mismatch should fail without retry.");

	match err {
		Error::Upstream(UpstreamError::Api { status, code, message, .. }) => {
			assert_eq!(status, 401);
			assert_eq!(code.as_deref(), Some("OAUTH_SCOPE_MISMATCH"));
			assert_eq!(message, "invalid oauth scope to access this URL");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	token.assert_calls_async(0).await;
	unauthorized.assert_calls_async(1).await;
}

#[tokio::test]
async fn server_errors_keep_status_and_retry_hint() {
	let server = MockServer::start_async().await;
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH);
			then.status(503).header("retry-after", "30").body("Service Unavailable");
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());

	relay.tokens().seed(TokenSecret::new("valid"));

	let err = relay.fetch_candidate(email_lookup()).await.expect_err("503 should surface.");

	match err {
		Error::Upstream(UpstreamError::Api { status, code, message, retry_after }) => {
			assert_eq!(status, 503);
			assert_eq!(code, None);
			assert_eq!(message, "Service Unavailable");
			assert_eq!(retry_after, Some(Duration::seconds(30)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	search.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_refresh_token_fails_before_any_api_call() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_code\"}");
		})
		.await;
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH);
			then.status(200).json_body(json!({ "data": [] }));
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());
	let err = relay
		.fetch_candidate(email_lookup())
		.await
		.expect_err("An invalid refresh token should fail the call.");

	assert!(matches!(err, Error::InvalidGrant { .. }));
	assert_eq!(relay.tokens().state(), TokenState::Absent);
	assert_eq!(relay.tokens().metrics().endpoint_failures(), 1);

	token.assert_calls_async(1).await;
	search.assert_calls_async(0).await;
}

#[tokio::test]
async fn concurrent_first_calls_share_one_refresh() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("shared"))
				.delay(std::time::Duration::from_millis(50));
		})
		.await;
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH).header("authorization", "Zoho-oauthtoken shared");
			then.status(200).json_body(json!({ "data": [] }));
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());
	let (first, second) =
		tokio::join!(relay.fetch_candidate(email_lookup()), relay.fetch_candidate(email_lookup()));

	first.expect("First concurrent lookup should succeed.");
	second.expect("Second concurrent lookup should succeed.");

	token.assert_calls_async(1).await;
	search.assert_calls_async(2).await;
}

#[tokio::test]
async fn failed_refresh_during_retry_keeps_stale_token_and_reports_body() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/token");
			then.status(500).header("content-type", "text/plain").body("oops");
		})
		.await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path(SEARCH_PATH).header("authorization", "Zoho-oauthtoken stale");
			then.status(401).json_body(invalid_token_body());
		})
		.await;
	let relay = build_reqwest_test_relay(&server.base_url());
	let stale = relay.tokens().seed(TokenSecret::new("stale"));
	let err = relay
		.fetch_candidate(email_lookup())
		.await
		.expect_err("Refresh failure during the retry should surface.");

	match &err {
		Error::Upstream(UpstreamError::TokenEndpoint { status, message, .. }) => {
			assert_eq!(*status, Some(500));
			assert!(message.contains("oops"), "Token endpoint body should reach the error: {message}.");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
	assert!(err.to_string().contains("oops"));

	let current = relay.tokens().current().expect("Stale token should stay cached.");

	assert_eq!(current.generation(), stale.generation());
	assert_eq!(current.secret().expose(), "stale");
	assert_eq!(relay.tokens().metrics().endpoint_failures(), 1);

	token.assert_calls_async(1).await;
	rejected.assert_calls_async(1).await;
}
