//! Renderable projection of the session state.

// self
use crate::{_prelude::*, auth::User, config::SessionTexts, metadata::Announcement};

/// Which title the screen shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
	/// Shown exactly once, on the first render.
	Initial,
	/// A user is signed in.
	LoggedIn,
	/// Nobody is signed in.
	LoggedOut,
}
impl Title {
	/// Resolves the title text from the configured texts.
	pub fn text<'a>(&self, texts: &'a SessionTexts) -> &'a str {
		match self {
			Title::Initial => &texts.initial_title,
			Title::LoggedIn => &texts.logged_in_title,
			Title::LoggedOut => &texts.logged_out_title,
		}
	}
}

/// Profile details shown for the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPanel {
	/// Display name.
	pub name: String,
	/// Email address.
	pub email: String,
	/// Picture location to hand to the image loader.
	pub picture_url: String,
}
impl From<&User> for UserPanel {
	fn from(user: &User) -> Self {
		Self { name: user.name.clone(), email: user.email.clone(), picture_url: user.picture_url.clone() }
	}
}

/// Everything a renderer needs to draw the session screen.
///
/// Optional sections are `Some` exactly when they are visible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
	/// Title to show.
	pub title: Title,
	/// Whether the login button is visible.
	pub login_button_visible: bool,
	/// Whether the logout button is visible.
	pub logout_button_visible: bool,
	/// User details; visible only while signed in.
	pub user_panel: Option<UserPanel>,
	/// Current affirmation text for the editor; visible only while signed in.
	pub affirmation_editor: Option<String>,
	/// Announcement button; visible only while signed in and an announcement is present.
	pub announcement: Option<Announcement>,
}
impl ViewState {
	/// Whether the user panel is visible.
	pub fn user_panel_visible(&self) -> bool {
		self.user_panel.is_some()
	}

	/// Whether the affirmation editor is visible.
	pub fn affirmation_editor_visible(&self) -> bool {
		self.affirmation_editor.is_some()
	}

	/// Whether the announcement button is visible.
	pub fn announcement_button_visible(&self) -> bool {
		self.announcement.is_some()
	}
}
