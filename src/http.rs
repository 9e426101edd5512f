//! `reqwest`-backed collaborators for the management API and profile pictures.
//!
//! [`ReqwestMetadataApi`] reads and patches `/api/v2/users/{id}` with the user's bearer token.
//! Non-2xx responses become [`CollaboratorError`]s carrying the HTTP status as their code and the
//! body's `message` field (when present) as their text.

// crates.io
use reqwest::{
	Response,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	collab::{CollabFuture, CollaboratorError, ImageFetcher, MetadataApi},
	config::ClientConfig,
	metadata::{MetadataError, MetadataUpdate, ProfileMetadata},
};

/// Management API client implementing [`MetadataApi`].
#[derive(Clone, Debug)]
pub struct ReqwestMetadataApi {
	client: ReqwestClient,
	base_url: Url,
}
impl ReqwestMetadataApi {
	/// Targets the tenant described by `config` with a default client.
	pub fn new(config: &ClientConfig) -> Self {
		Self::with_base_url(ReqwestClient::default(), config.base_url().clone())
	}

	/// Targets an explicit base URL (e.g. a local mock) with a caller-provided client.
	pub fn with_base_url(client: ReqwestClient, base_url: Url) -> Self {
		Self { client, base_url }
	}

	/// URL of the user resource for `user_id`.
	pub fn user_url(&self, user_id: &str) -> Result<Url, CollaboratorError> {
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| CollaboratorError::new("Management API base URL cannot hold a path."))?
			.pop_if_empty()
			.extend(["api", "v2", "users", user_id]);

		Ok(url)
	}

	async fn fetch_profile(
		&self,
		user_id: &str,
		access_token: &AccessToken,
	) -> Result<ProfileMetadata, CollaboratorError> {
		let response = self
			.client
			.get(self.user_url(user_id)?)
			.bearer_auth(access_token.expose())
			.header(ACCEPT, "application/json")
			.send()
			.await?;
		let bytes = ensure_success(response).await?.bytes().await?;

		ProfileMetadata::from_profile_json(&bytes).map_err(|MetadataError::Parse(e)| {
			CollaboratorError::new(format!("Profile metadata is malformed at `{}`.", e.path()))
		})
	}

	async fn patch_profile(
		&self,
		user_id: &str,
		access_token: &AccessToken,
		update: MetadataUpdate,
	) -> Result<(), CollaboratorError> {
		let body = serde_json::to_vec(&update.to_request_body())
			.map_err(|e| CollaboratorError::new(format!("Metadata update could not be encoded: {e}.")))?;
		let response = self
			.client
			.patch(self.user_url(user_id)?)
			.bearer_auth(access_token.expose())
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await?;

		ensure_success(response).await?;

		Ok(())
	}
}
impl MetadataApi for ReqwestMetadataApi {
	fn get_metadata<'a>(
		&'a self,
		user_id: &'a str,
		access_token: &'a AccessToken,
	) -> CollabFuture<'a, ProfileMetadata> {
		Box::pin(self.fetch_profile(user_id, access_token))
	}

	fn set_metadata<'a>(
		&'a self,
		user_id: &'a str,
		access_token: &'a AccessToken,
		update: MetadataUpdate,
	) -> CollabFuture<'a, ()> {
		Box::pin(self.patch_profile(user_id, access_token, update))
	}
}

/// Plain HTTP image loader implementing [`ImageFetcher`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestImageFetcher(pub ReqwestClient);
impl ReqwestImageFetcher {
	/// Wraps an existing client.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl ImageFetcher for ReqwestImageFetcher {
	fn fetch<'a>(&'a self, url: &'a Url) -> CollabFuture<'a, Vec<u8>> {
		Box::pin(async move {
			let response = self.0.get(url.clone()).send().await?;
			let bytes = ensure_success(response).await?.bytes().await?;

			Ok(bytes.to_vec())
		})
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	message: Option<String>,
	error: Option<String>,
}

async fn ensure_success(response: Response) -> Result<Response, CollaboratorError> {
	let status = response.status();

	if status.is_success() {
		return Ok(response);
	}

	let body = response.bytes().await.unwrap_or_default();
	let message = serde_json::from_slice::<ErrorBody>(&body)
		.ok()
		.and_then(|b| b.message.or(b.error))
		.filter(|m| !m.trim().is_empty())
		.unwrap_or_else(|| {
			format!("Request failed with status {}.", status.canonical_reason().unwrap_or("unknown"))
		});

	Err(CollaboratorError::with_code(status.as_u16(), message))
}
