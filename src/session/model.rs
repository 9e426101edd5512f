//! Single-writer state machine deciding what the session screen shows.
//!
//! Requests (`request_*`) move the phase forward and hand back the [`Effect`] the caller must
//! dispatch to a collaborator; callbacks (`on_*`) apply the collaborator's single terminal
//! result. A request whose precondition does not hold is a no-op and yields no effect.

// std
use std::mem;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, User},
	collab::{LoginRequest, LogoutRequest},
	config::{ClientConfig, SessionTexts},
	error::SessionFailure,
	metadata::{MetadataUpdate, ProfileMetadata},
	session::{
		notify::{Notification, NotificationEvent},
		state::{ActiveSession, Phase, SessionPhase, SessionState},
		view::ViewState,
	},
};

/// Collaborator call requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
	/// Start an interactive login.
	Login(LoginRequest),
	/// End the provider session.
	Logout(LogoutRequest),
	/// Fetch metadata for the signed-in user.
	FetchMetadata {
		/// Subject the metadata belongs to.
		user_id: String,
		/// Credential to present.
		access_token: AccessToken,
	},
	/// Save metadata for the signed-in user.
	SaveMetadata {
		/// Subject the metadata belongs to.
		user_id: String,
		/// Credential to present.
		access_token: AccessToken,
		/// Payload to merge.
		update: MetadataUpdate,
	},
}

/// Owns the [`SessionState`] and applies every transition to it.
#[derive(Clone, Debug)]
pub struct SessionViewModel {
	state: SessionState,
	login_request: LoginRequest,
	logout_request: LogoutRequest,
	texts: SessionTexts,
	notifications: Vec<Notification>,
}
impl SessionViewModel {
	/// Creates an unauthenticated view model.
	pub fn new(config: &ClientConfig, texts: SessionTexts) -> Self {
		Self {
			state: SessionState::default(),
			login_request: config.login_request(),
			logout_request: config.logout_request(),
			texts,
			notifications: Vec::new(),
		}
	}

	/// Read-only access to the state.
	pub fn state(&self) -> &SessionState {
		&self.state
	}

	/// Current phase.
	pub fn phase(&self) -> SessionPhase {
		self.state.phase()
	}

	/// Texts used for titles and notifications.
	pub fn texts(&self) -> &SessionTexts {
		&self.texts
	}

	/// Pure projection of the current state.
	pub fn view(&self) -> ViewState {
		self.state.view()
	}

	/// Projects the state and consumes the one-shot initial title.
	pub fn render(&mut self) -> ViewState {
		let view = self.state.view();

		self.state.has_rendered_once = true;

		view
	}

	/// Drains queued notifications in the order they were raised.
	pub fn take_notifications(&mut self) -> Vec<Notification> {
		mem::take(&mut self.notifications)
	}

	/// Starts a login from the `Unauthenticated` phase.
	pub fn request_login(&mut self) -> Option<Effect> {
		if !matches!(self.state.phase, Phase::Unauthenticated) {
			self.ignore("request_login");

			return None;
		}

		self.state.phase = Phase::Authenticating;

		Some(Effect::Login(self.login_request.clone()))
	}

	/// Applies a successful login and requests the user's metadata.
	///
	/// Credentials whose identity token cannot be decoded, or whose access credential is
	/// empty, are treated as a failed login.
	pub fn on_login_succeeded(&mut self, credentials: Credentials) -> Option<Effect> {
		if !matches!(self.state.phase, Phase::Authenticating) {
			self.ignore("on_login_succeeded");

			return None;
		}
		if credentials.access_token.is_empty() {
			self.on_login_failed("Login returned an empty access credential");

			return None;
		}

		let user = match User::from_id_token(&credentials.id_token) {
			Ok(user) => user,
			Err(e) => {
				self.on_login_failed(e.to_string().trim_end_matches('.'));

				return None;
			},
		};
		let message = self.texts.login_success_message(&user.name);

		self.state.phase =
			Phase::Authenticated(ActiveSession { user, access_token: credentials.access_token });
		self.notify(Notification::new(NotificationEvent::LoginSucceeded, message, None));

		self.request_metadata()
	}

	/// Returns to `Unauthenticated` after a cancelled or rejected login.
	pub fn on_login_failed(&mut self, reason: impl Into<String>) {
		if !matches!(self.state.phase, Phase::Authenticating) {
			self.ignore("on_login_failed");

			return;
		}

		self.state.phase = Phase::Unauthenticated;
		self.fail(SessionFailure::Login { reason: reason.into() });
	}

	/// Starts a logout from the `Authenticated` phase.
	pub fn request_logout(&mut self) -> Option<Effect> {
		match mem::take(&mut self.state.phase) {
			Phase::Authenticated(active) => {
				self.state.phase = Phase::LoggingOut(active);

				Some(Effect::Logout(self.logout_request.clone()))
			},
			other => {
				self.state.phase = other;
				self.ignore("request_logout");

				None
			},
		}
	}

	/// Clears the session after the provider confirmed the logout.
	pub fn on_logout_succeeded(&mut self) {
		if !matches!(self.state.phase, Phase::LoggingOut(_)) {
			self.ignore("on_logout_succeeded");

			return;
		}

		self.state.phase = Phase::Unauthenticated;
		self.state.personal_affirmation.clear();
		self.state.announcement = None;
	}

	/// Restores the signed-in session after a failed logout.
	pub fn on_logout_failed(&mut self, code: Option<u16>) {
		match mem::take(&mut self.state.phase) {
			Phase::LoggingOut(active) => {
				self.state.phase = Phase::Authenticated(active);
				self.fail(SessionFailure::Logout { code });
			},
			other => {
				self.state.phase = other;
				self.ignore("on_logout_failed");
			},
		}
	}

	/// Requests the signed-in user's metadata.
	pub fn request_metadata(&mut self) -> Option<Effect> {
		let Some(active) = self.state.active().filter(|a| !a.access_token.is_empty()) else {
			self.ignore("request_metadata");

			return None;
		};

		Some(Effect::FetchMetadata {
			user_id: active.user.id.clone(),
			access_token: active.access_token.clone(),
		})
	}

	/// Stores metadata fetched for `user_id`. The announcement is replaced by whatever the
	/// candidate resolves to.
	///
	/// Results for anyone but the current session's user are dropped, so a fetch that outlives
	/// its session never leaks into the next one.
	pub fn on_metadata_loaded(&mut self, user_id: &str, metadata: ProfileMetadata) {
		if !self.owns_session(user_id) {
			self.ignore("on_metadata_loaded");

			return;
		}

		self.state.announcement = metadata.announcement.resolve();
		self.state.personal_affirmation = metadata.personal_affirmation;
	}

	/// Surfaces a failed metadata fetch issued for `user_id`.
	pub fn on_metadata_load_failed(&mut self, user_id: &str, code: Option<u16>) {
		if !self.owns_session(user_id) {
			self.ignore("on_metadata_load_failed");

			return;
		}

		self.fail(SessionFailure::MetadataRead { code });
	}

	/// Requests saving `text` (trimmed) as the user's personal affirmation.
	///
	/// The trimmed text becomes the displayed affirmation right away and stays even if the
	/// save later fails.
	pub fn request_save_affirmation(&mut self, text: &str) -> Option<Effect> {
		let Some(active) = self.state.active().filter(|a| !a.access_token.is_empty()) else {
			self.ignore("request_save_affirmation");

			return None;
		};
		let update = MetadataUpdate::affirmation(text);
		let effect = Effect::SaveMetadata {
			user_id: active.user.id.clone(),
			access_token: active.access_token.clone(),
			update: update.clone(),
		};

		self.state.personal_affirmation = update.personal_affirmation;

		Some(effect)
	}

	/// Surfaces a successful save.
	pub fn on_save_succeeded(&mut self) {
		let message = self.texts.general_success.clone();

		self.notify(Notification::new(NotificationEvent::MetadataSaved, message, None));
	}

	/// Surfaces a failed save.
	pub fn on_save_failed(&mut self, code: Option<u16>) {
		self.fail(SessionFailure::MetadataWrite { code });
	}

	fn owns_session(&self, user_id: &str) -> bool {
		let user = self.state.user();

		!user.is_empty() && user.id == user_id
	}

	fn fail(&mut self, failure: SessionFailure) {
		let message = match &failure {
			SessionFailure::Login { .. } => self.texts.login_failure.clone(),
			other => self.texts.failure_message(other.code()),
		};

		#[cfg(feature = "tracing")]
		tracing::debug!(error = %failure, phase = %self.phase(), "session request failed");

		self.notify(Notification::new(NotificationEvent::from(&failure), message, failure.code()));
	}

	fn notify(&mut self, notification: Notification) {
		self.notifications.push(notification);
	}

	fn ignore(&self, event: &'static str) {
		#[cfg(feature = "tracing")]
		tracing::debug!(event, phase = %self.phase(), "ignored session event");

		#[cfg(not(feature = "tracing"))]
		let _ = event;
	}
}
