//! Authenticated-session view state for apps that sign users in through a hosted identity
//! provider and keep free-form metadata on their profile.
//!
//! The crate is organized around [`session::SessionViewModel`], a single-writer state machine
//! fed by login, logout, and metadata outcomes. Identity providers, metadata APIs, and image
//! loaders are plugged in through the contracts in [`collab`], and
//! [`session::SessionController`] drives them asynchronously.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod collab;
pub mod config;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod metadata;
pub mod obs;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and scripted collaborators for integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::{
		auth::{AccessToken, Credentials},
		collab::{
			CollabFuture, CollaboratorError, IdentityProvider, ImageFetcher, LoginRequest,
			LogoutRequest, MetadataApi,
		},
		config::{ClientConfig, SessionTexts},
		metadata::{MetadataUpdate, ProfileMetadata},
		session::SessionController,
	};

	/// Controller type alias used across integration tests.
	pub type TestController = SessionController<ScriptedIdentityProvider, RecordingMetadataApi>;

	/// Builds an unsigned ID token carrying the provided claims.
	pub fn fake_id_token(sub: &str, name: &str, email: &str, picture: &str) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
		let claims = serde_json::json!({
			"sub": sub,
			"name": name,
			"email": email,
			"picture": picture,
		});
		let payload = URL_SAFE_NO_PAD.encode(claims.to_string());

		format!("{header}.{payload}.signature")
	}

	/// Builds credentials for a fixture user with the provided access token.
	pub fn fake_credentials(sub: &str, access_token: &str) -> Credentials {
		Credentials::new(
			fake_id_token(sub, "Ada Lovelace", "ada@example.com", "https://example.com/ada.png"),
			access_token,
		)
	}

	/// Client configuration shared by tests.
	pub fn test_client_config() -> ClientConfig {
		ClientConfig::builder()
			.client_id("client-test")
			.domain("tenant.example.com")
			.scheme("demo")
			.build()
			.expect("Test client configuration should build successfully.")
	}

	/// Constructs a controller wired to fresh scripted collaborators.
	pub fn build_test_controller()
	-> (TestController, Arc<ScriptedIdentityProvider>, Arc<RecordingMetadataApi>) {
		let identity = Arc::new(ScriptedIdentityProvider::default());
		let metadata = Arc::new(RecordingMetadataApi::default());
		let controller = SessionController::new(
			&test_client_config(),
			SessionTexts::default(),
			identity.clone(),
			metadata.clone(),
		);

		(controller, identity, metadata)
	}

	/// Identity provider that replays queued results and records every request.
	#[derive(Debug, Default)]
	pub struct ScriptedIdentityProvider {
		logins: Mutex<VecDeque<Result<Credentials, CollaboratorError>>>,
		logouts: Mutex<VecDeque<Result<(), CollaboratorError>>>,
		login_requests: Mutex<Vec<LoginRequest>>,
		logout_requests: Mutex<Vec<LogoutRequest>>,
	}
	impl ScriptedIdentityProvider {
		/// Queues the result of the next login.
		pub fn push_login(&self, result: Result<Credentials, CollaboratorError>) {
			self.logins.lock().push_back(result);
		}

		/// Queues the result of the next logout.
		pub fn push_logout(&self, result: Result<(), CollaboratorError>) {
			self.logouts.lock().push_back(result);
		}

		/// Login requests received so far.
		pub fn login_requests(&self) -> Vec<LoginRequest> {
			self.login_requests.lock().clone()
		}

		/// Logout requests received so far.
		pub fn logout_requests(&self) -> Vec<LogoutRequest> {
			self.logout_requests.lock().clone()
		}
	}
	impl IdentityProvider for ScriptedIdentityProvider {
		fn login(&self, request: LoginRequest) -> CollabFuture<'_, Credentials> {
			self.login_requests.lock().push(request);

			let next = self.logins.lock().pop_front();

			Box::pin(async move {
				next.unwrap_or_else(|| Err(CollaboratorError::new("No login result was scripted.")))
			})
		}

		fn logout(&self, request: LogoutRequest) -> CollabFuture<'_, ()> {
			self.logout_requests.lock().push(request);

			let next = self.logouts.lock().pop_front().unwrap_or(Ok(()));

			Box::pin(async move { next })
		}
	}

	/// Metadata read recorded by [`RecordingMetadataApi`].
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct RecordedRead {
		/// User the metadata was requested for.
		pub user_id: String,
		/// Bearer credential presented with the request.
		pub access_token: String,
	}

	/// Metadata write recorded by [`RecordingMetadataApi`].
	#[derive(Clone, Debug, PartialEq, Eq)]
	pub struct RecordedWrite {
		/// User the metadata was written for.
		pub user_id: String,
		/// Bearer credential presented with the request.
		pub access_token: String,
		/// Payload that was sent.
		pub update: MetadataUpdate,
	}

	/// Metadata API that records calls and replays queued results.
	///
	/// Reads without a queued result return [`ProfileMetadata::default`]; writes succeed.
	#[derive(Debug, Default)]
	pub struct RecordingMetadataApi {
		read_results: Mutex<VecDeque<Result<ProfileMetadata, CollaboratorError>>>,
		write_results: Mutex<VecDeque<Result<(), CollaboratorError>>>,
		reads: Mutex<Vec<RecordedRead>>,
		writes: Mutex<Vec<RecordedWrite>>,
	}
	impl RecordingMetadataApi {
		/// Queues the result of the next metadata read.
		pub fn push_read(&self, result: Result<ProfileMetadata, CollaboratorError>) {
			self.read_results.lock().push_back(result);
		}

		/// Queues the result of the next metadata write.
		pub fn push_write(&self, result: Result<(), CollaboratorError>) {
			self.write_results.lock().push_back(result);
		}

		/// Reads received so far.
		pub fn reads(&self) -> Vec<RecordedRead> {
			self.reads.lock().clone()
		}

		/// Writes received so far.
		pub fn writes(&self) -> Vec<RecordedWrite> {
			self.writes.lock().clone()
		}
	}
	impl MetadataApi for RecordingMetadataApi {
		fn get_metadata<'a>(
			&'a self,
			user_id: &'a str,
			access_token: &'a AccessToken,
		) -> CollabFuture<'a, ProfileMetadata> {
			self.reads.lock().push(RecordedRead {
				user_id: user_id.to_owned(),
				access_token: access_token.expose().to_owned(),
			});

			let next = self.read_results.lock().pop_front().unwrap_or_else(|| Ok(Default::default()));

			Box::pin(async move { next })
		}

		fn set_metadata<'a>(
			&'a self,
			user_id: &'a str,
			access_token: &'a AccessToken,
			update: MetadataUpdate,
		) -> CollabFuture<'a, ()> {
			self.writes.lock().push(RecordedWrite {
				user_id: user_id.to_owned(),
				access_token: access_token.expose().to_owned(),
				update,
			});

			let next = self.write_results.lock().pop_front().unwrap_or(Ok(()));

			Box::pin(async move { next })
		}
	}

	/// Image fetcher that serves fixed bytes for one URL and fails for everything else.
	#[derive(Clone, Debug)]
	pub struct StaticImageFetcher {
		/// URL that resolves successfully.
		pub url: Url,
		/// Bytes returned for [`StaticImageFetcher::url`].
		pub bytes: Vec<u8>,
	}
	impl ImageFetcher for StaticImageFetcher {
		fn fetch<'a>(&'a self, url: &'a Url) -> CollabFuture<'a, Vec<u8>> {
			Box::pin(async move {
				if url == &self.url {
					Ok(self.bytes.clone())
				} else {
					Err(CollaboratorError::with_code(404, "Image not found."))
				}
			})
		}
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
