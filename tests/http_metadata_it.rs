// crates.io
use httpmock::prelude::*;
// self
use metadata_session::{
	auth::AccessToken,
	collab::{ImageFetcher, MetadataApi},
	http::{ReqwestImageFetcher, ReqwestMetadataApi},
	metadata::MetadataUpdate,
	reqwest::Client,
	url::Url,
};

fn api(server: &MockServer) -> ReqwestMetadataApi {
	let base = Url::parse(&server.url("/")).expect("Mock server base URL should parse.");

	ReqwestMetadataApi::with_base_url(Client::new(), base)
}

#[tokio::test]
async fn get_metadata_parses_profile_document() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v2/users/user-123")
				.header("authorization", "Bearer tok123");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"user_id": "user-123",
					"user_metadata": {"personal_affirmation": "I can do hard things"},
					"app_metadata": {
						"display_announcement": true,
						"announcement_text": "Launch week",
						"announcement_url": "https://example.com/launch"
					}
				}"#,
			);
		})
		.await;
	let metadata = api(&server)
		.get_metadata("user-123", &AccessToken::new("tok123"))
		.await
		.expect("Metadata fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(metadata.personal_affirmation, "I can do hard things");

	let announcement =
		metadata.announcement.resolve().expect("Announcement should resolve from app metadata.");

	assert_eq!(announcement.text, "Launch week");
	assert_eq!(announcement.url.as_str(), "https://example.com/launch");
}

#[tokio::test]
async fn get_metadata_maps_error_status_and_message() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/users/user-123");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"statusCode":401,"error":"Unauthorized","message":"Invalid token"}"#);
		})
		.await;

	let err = api(&server)
		.get_metadata("user-123", &AccessToken::new("expired"))
		.await
		.expect_err("Unauthorized responses should fail.");

	assert_eq!(err.code, Some(401));
	assert_eq!(err.message, "Invalid token");
}

#[tokio::test]
async fn get_metadata_rejects_malformed_documents() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/users/user-123");
			then.status(200).body(r#"{"user_metadata": {"personal_affirmation": 42}}"#);
		})
		.await;

	let err = api(&server)
		.get_metadata("user-123", &AccessToken::new("tok123"))
		.await
		.expect_err("Wrongly typed metadata should fail.");

	assert_eq!(err.code, None);
	assert!(err.message.contains("personal_affirmation"));
}

#[tokio::test]
async fn set_metadata_patches_user_metadata() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/api/v2/users/user-123")
				.header("authorization", "Bearer tok123")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({
					"user_metadata": {"personal_affirmation": "hello"}
				}));
			then.status(200).body("{}");
		})
		.await;

	api(&server)
		.set_metadata("user-123", &AccessToken::new("tok123"), MetadataUpdate::affirmation("  hello "))
		.await
		.expect("Metadata update should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn set_metadata_falls_back_to_status_reason() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/v2/users/user-123");
			then.status(503).body("upstream down");
		})
		.await;

	let err = api(&server)
		.set_metadata("user-123", &AccessToken::new("tok123"), MetadataUpdate::affirmation("x"))
		.await
		.expect_err("Server errors should fail.");

	assert_eq!(err.code, Some(503));
	assert_eq!(err.message, "Request failed with status Service Unavailable.");
}

#[tokio::test]
async fn image_fetcher_returns_body_bytes() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/ada.png");
			then.status(200).header("content-type", "image/png").body([0x89_u8, b'P', b'N', b'G']);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/missing.png");
			then.status(404);
		})
		.await;

	let fetcher = ReqwestImageFetcher::default();
	let found = Url::parse(&server.url("/ada.png")).expect("Image URL should parse.");
	let missing = Url::parse(&server.url("/missing.png")).expect("Image URL should parse.");

	assert_eq!(
		fetcher.fetch(&found).await.expect("Existing image should download."),
		vec![0x89, b'P', b'N', b'G']
	);
	assert_eq!(fetcher.fetch(&missing).await.expect_err("Missing image should fail.").code, Some(404));
}
