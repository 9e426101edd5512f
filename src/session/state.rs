//! Session state owned by the view model.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, User},
	metadata::Announcement,
	session::view::{Title, UserPanel, ViewState},
};

static EMPTY_USER: User =
	User { id: String::new(), name: String::new(), email: String::new(), picture_url: String::new() };

/// Coarse authentication phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
	/// Nobody is signed in.
	Unauthenticated,
	/// A login is in flight.
	Authenticating,
	/// A user is signed in.
	Authenticated,
	/// A logout is in flight.
	LoggingOut,
}
impl SessionPhase {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionPhase::Unauthenticated => "unauthenticated",
			SessionPhase::Authenticating => "authenticating",
			SessionPhase::Authenticated => "authenticated",
			SessionPhase::LoggingOut => "logging_out",
		}
	}
}
impl Display for SessionPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Signed-in user together with the credential issued at login.
#[derive(Clone, Debug)]
pub struct ActiveSession {
	/// Decoded identity.
	pub user: User,
	/// Bearer credential for metadata calls.
	pub access_token: AccessToken,
}

/// Phase plus the data only meaningful in that phase.
///
/// `LoggingOut` keeps the active session so a failed logout can restore it.
#[derive(Clone, Debug, Default)]
pub(crate) enum Phase {
	#[default]
	Unauthenticated,
	Authenticating,
	Authenticated(ActiveSession),
	LoggingOut(ActiveSession),
}

/// Mutable session state; only [`SessionViewModel`](crate::session::SessionViewModel) writes it.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
	pub(crate) phase: Phase,
	pub(crate) personal_affirmation: String,
	pub(crate) announcement: Option<Announcement>,
	pub(crate) has_rendered_once: bool,
}
impl SessionState {
	/// Current phase.
	pub fn phase(&self) -> SessionPhase {
		match self.phase {
			Phase::Unauthenticated => SessionPhase::Unauthenticated,
			Phase::Authenticating => SessionPhase::Authenticating,
			Phase::Authenticated(_) => SessionPhase::Authenticated,
			Phase::LoggingOut(_) => SessionPhase::LoggingOut,
		}
	}

	/// Returns `true` while a user is signed in and no logout is pending.
	pub fn is_authenticated(&self) -> bool {
		matches!(self.phase, Phase::Authenticated(_))
	}

	/// Current user; the empty instance when no session is active.
	pub fn user(&self) -> &User {
		match &self.phase {
			Phase::Authenticated(active) | Phase::LoggingOut(active) => &active.user,
			Phase::Unauthenticated | Phase::Authenticating => &EMPTY_USER,
		}
	}

	/// Access credential, exposed only in the `Authenticated` phase.
	pub fn access_token(&self) -> Option<&AccessToken> {
		match &self.phase {
			Phase::Authenticated(active) => Some(&active.access_token),
			_ => None,
		}
	}

	/// Last fetched or saved personal affirmation.
	pub fn personal_affirmation(&self) -> &str {
		&self.personal_affirmation
	}

	/// Announcement resolved from application metadata, regardless of phase.
	pub fn announcement(&self) -> Option<&Announcement> {
		self.announcement.as_ref()
	}

	/// Returns `true` once the initial title has been rendered.
	pub fn has_rendered_once(&self) -> bool {
		self.has_rendered_once
	}

	/// Projects the state into what the screen should show. Never mutates.
	pub fn view(&self) -> ViewState {
		let authenticated = self.is_authenticated();
		let title = if !self.has_rendered_once {
			Title::Initial
		} else if authenticated {
			Title::LoggedIn
		} else {
			Title::LoggedOut
		};

		ViewState {
			title,
			login_button_visible: !authenticated,
			logout_button_visible: authenticated,
			user_panel: authenticated.then(|| UserPanel::from(self.user())),
			affirmation_editor: authenticated.then(|| self.personal_affirmation.clone()),
			announcement: self.announcement.clone().filter(|_| authenticated),
		}
	}

	pub(crate) fn active(&self) -> Option<&ActiveSession> {
		match &self.phase {
			Phase::Authenticated(active) => Some(active),
			_ => None,
		}
	}
}
