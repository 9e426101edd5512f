//! Contracts for the external collaborators the session depends on.
//!
//! Each request resolves exactly once, either with a value or with a [`CollaboratorError`]. The
//! crate never retries; timeouts and cancellation belong to the implementation.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials},
	metadata::{MetadataUpdate, ProfileMetadata},
};

/// Boxed single-resolution future returned by every collaborator call.
pub type CollabFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, CollaboratorError>> + 'a + Send>>;

/// Hosted login and logout (redirect flow handled by the implementation).
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	/// Starts an interactive login and resolves with the issued credentials.
	fn login(&self, request: LoginRequest) -> CollabFuture<'_, Credentials>;

	/// Ends the provider session.
	fn logout(&self, request: LogoutRequest) -> CollabFuture<'_, ()>;
}

/// Per-user metadata storage reached through a management API.
pub trait MetadataApi
where
	Self: Send + Sync,
{
	/// Fetches the user's profile metadata.
	fn get_metadata<'a>(
		&'a self,
		user_id: &'a str,
		access_token: &'a AccessToken,
	) -> CollabFuture<'a, ProfileMetadata>;

	/// Merges `update` into the user's metadata.
	fn set_metadata<'a>(
		&'a self,
		user_id: &'a str,
		access_token: &'a AccessToken,
		update: MetadataUpdate,
	) -> CollabFuture<'a, ()>;
}

/// Best-effort image download used for profile pictures.
pub trait ImageFetcher
where
	Self: Send + Sync,
{
	/// Downloads the raw image bytes stored at `url`.
	fn fetch<'a>(&'a self, url: &'a Url) -> CollabFuture<'a, Vec<u8>>;
}

/// Parameters handed to [`IdentityProvider::login`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
	/// Custom URL scheme the provider redirects back to.
	pub scheme: String,
	/// API audience the access token is minted for.
	pub audience: Url,
	/// Space-delimited scopes requested from the provider.
	pub scope: String,
}

/// Parameters handed to [`IdentityProvider::logout`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoutRequest {
	/// Custom URL scheme the provider redirects back to.
	pub scheme: String,
}

/// Failure reported by a collaborator.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct CollaboratorError {
	/// Numeric error code (usually an HTTP status), when the collaborator supplies one.
	pub code: Option<u16>,
	/// Human-readable reason.
	pub message: String,
}
impl CollaboratorError {
	/// Creates an error without a code.
	pub fn new(message: impl Into<String>) -> Self {
		Self { code: None, message: message.into() }
	}

	/// Creates an error carrying a numeric code.
	pub fn with_code(code: u16, message: impl Into<String>) -> Self {
		Self { code: Some(code), message: message.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for CollaboratorError {
	fn from(e: ReqwestError) -> Self {
		Self { code: e.status().map(|s| s.as_u16()), message: e.to_string() }
	}
}
