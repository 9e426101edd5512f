//! Async driver that connects the view model to its collaborators.

// self
use crate::{
	_prelude::*,
	collab::{IdentityProvider, ImageFetcher, MetadataApi},
	config::{ClientConfig, SessionTexts},
	obs::{self, RequestKind, RequestOutcome, RequestSpan},
	session::{
		model::{Effect, SessionViewModel},
		notify::Notification,
		state::SessionPhase,
		view::ViewState,
	},
};

/// Runs session requests against the identity provider and metadata API.
///
/// The view model sits behind a lock that is held only while a transition is applied, never
/// across an `.await`, so callbacks and new requests interleave safely. Every collaborator call
/// resolves exactly once and its result is applied exactly once.
pub struct SessionController<P, M>
where
	P: ?Sized + IdentityProvider,
	M: ?Sized + MetadataApi,
{
	/// Login/logout collaborator.
	pub identity: Arc<P>,
	/// Metadata read/write collaborator.
	pub metadata: Arc<M>,
	/// Optional profile picture loader.
	pub images: Option<Arc<dyn ImageFetcher>>,
	model: Mutex<SessionViewModel>,
}
impl<P, M> SessionController<P, M>
where
	P: ?Sized + IdentityProvider,
	M: ?Sized + MetadataApi,
{
	/// Creates a controller with an unauthenticated view model.
	pub fn new(
		config: &ClientConfig,
		texts: SessionTexts,
		identity: impl Into<Arc<P>>,
		metadata: impl Into<Arc<M>>,
	) -> Self {
		Self {
			identity: identity.into(),
			metadata: metadata.into(),
			images: None,
			model: Mutex::new(SessionViewModel::new(config, texts)),
		}
	}

	/// Attaches the loader used by [`SessionController::load_picture`].
	pub fn with_image_fetcher(mut self, images: Arc<dyn ImageFetcher>) -> Self {
		self.images = Some(images);

		self
	}

	/// Current phase.
	pub fn phase(&self) -> SessionPhase {
		self.model.lock().phase()
	}

	/// Pure projection of the current state.
	pub fn view(&self) -> ViewState {
		self.model.lock().view()
	}

	/// Projects the state for rendering and consumes the one-shot initial title.
	pub fn render(&self) -> ViewState {
		self.model.lock().render()
	}

	/// Drains queued notifications.
	pub fn take_notifications(&self) -> Vec<Notification> {
		self.model.lock().take_notifications()
	}

	/// Runs `f` with shared access to the view model.
	pub fn with_model<T>(&self, f: impl FnOnce(&SessionViewModel) -> T) -> T {
		f(&self.model.lock())
	}

	/// Logs the user in, then fetches their metadata. Ignored unless signed out.
	pub async fn login(&self) {
		let effect = self.model.lock().request_login();

		self.run(effect).await;
	}

	/// Logs the user out. Ignored unless signed in.
	pub async fn logout(&self) {
		let effect = self.model.lock().request_logout();

		self.run(effect).await;
	}

	/// Re-fetches the signed-in user's metadata.
	pub async fn refresh_metadata(&self) {
		let effect = self.model.lock().request_metadata();

		self.run(effect).await;
	}

	/// Saves `text` (trimmed) as the user's personal affirmation.
	pub async fn save_affirmation(&self, text: &str) {
		let effect = self.model.lock().request_save_affirmation(text);

		self.run(effect).await;
	}

	/// Downloads the signed-in user's profile picture.
	///
	/// Best effort: a missing loader, a missing or invalid URL, or a failed download yields
	/// `None`, and failures are only logged. Dropping the future abandons the download.
	pub async fn load_picture(&self) -> Option<Vec<u8>> {
		let images = self.images.clone()?;
		let picture_url = {
			let model = self.model.lock();
			let state = model.state();

			if !state.is_authenticated() {
				return None;
			}

			state.user().picture_url.clone()
		};
		let url = Url::parse(&picture_url).ok()?;
		let span = RequestSpan::new(RequestKind::ImageFetch, "load_picture");

		obs::record_request_outcome(RequestKind::ImageFetch, RequestOutcome::Attempt);

		match span.instrument(images.fetch(&url)).await {
			Ok(bytes) => {
				obs::record_request_outcome(RequestKind::ImageFetch, RequestOutcome::Success);

				Some(bytes)
			},
			Err(e) => {
				obs::record_request_outcome(RequestKind::ImageFetch, RequestOutcome::Failure);

				#[cfg(feature = "tracing")]
				tracing::warn!(error = %e, "profile picture could not be loaded");
				#[cfg(not(feature = "tracing"))]
				let _ = e;

				None
			},
		}
	}

	async fn run(&self, effect: Option<Effect>) {
		let mut next = effect;

		while let Some(effect) = next.take() {
			next = self.dispatch(effect).await;
		}
	}

	async fn dispatch(&self, effect: Effect) -> Option<Effect> {
		match effect {
			Effect::Login(request) => {
				let result = self.call(RequestKind::Login, self.identity.login(request)).await;
				let mut model = self.model.lock();

				match result {
					Ok(credentials) => model.on_login_succeeded(credentials),
					Err(e) => {
						model.on_login_failed(e.message);

						None
					},
				}
			},
			Effect::Logout(request) => {
				let result = self.call(RequestKind::Logout, self.identity.logout(request)).await;
				let mut model = self.model.lock();

				match result {
					Ok(()) => model.on_logout_succeeded(),
					Err(e) => model.on_logout_failed(e.code),
				}

				None
			},
			Effect::FetchMetadata { user_id, access_token } => {
				let result = self
					.call(RequestKind::MetadataRead, self.metadata.get_metadata(&user_id, &access_token))
					.await;
				let mut model = self.model.lock();

				match result {
					Ok(metadata) => model.on_metadata_loaded(&user_id, metadata),
					Err(e) => model.on_metadata_load_failed(&user_id, e.code),
				}

				None
			},
			Effect::SaveMetadata { user_id, access_token, update } => {
				let result = self
					.call(
						RequestKind::MetadataWrite,
						self.metadata.set_metadata(&user_id, &access_token, update),
					)
					.await;
				let mut model = self.model.lock();

				match result {
					Ok(()) => model.on_save_succeeded(),
					Err(e) => model.on_save_failed(e.code),
				}

				None
			},
		}
	}

	async fn call<T, E, Fut>(&self, kind: RequestKind, fut: Fut) -> Result<T, E>
	where
		Fut: Future<Output = Result<T, E>>,
	{
		let span = RequestSpan::new(kind, "dispatch");

		obs::record_request_outcome(kind, RequestOutcome::Attempt);

		let result = span.instrument(fut).await;
		let outcome = if result.is_ok() { RequestOutcome::Success } else { RequestOutcome::Failure };

		obs::record_request_outcome(kind, outcome);

		result
	}
}
impl<P, M> Debug for SessionController<P, M>
where
	P: ?Sized + IdentityProvider,
	M: ?Sized + MetadataApi,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionController")
			.field("phase", &self.phase())
			.field("images_set", &self.images.is_some())
			.finish()
	}
}
