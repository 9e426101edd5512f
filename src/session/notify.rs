//! Transient user-facing notifications.

// self
use crate::{_prelude::*, error::SessionFailure};

/// Tone of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
	/// Something the user asked for worked.
	Success,
	/// A collaborator request failed.
	Failure,
}

/// What triggered a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationEvent {
	/// Login completed.
	LoginSucceeded,
	/// Login was cancelled or rejected.
	LoginFailed,
	/// Logout could not be completed.
	LogoutFailed,
	/// Metadata could not be fetched.
	MetadataReadFailed,
	/// Metadata could not be saved.
	MetadataWriteFailed,
	/// Metadata was saved.
	MetadataSaved,
}
impl NotificationEvent {
	/// Tone associated with the event.
	pub fn kind(self) -> NotificationKind {
		match self {
			Self::LoginSucceeded | Self::MetadataSaved => NotificationKind::Success,
			_ => NotificationKind::Failure,
		}
	}
}
impl From<&SessionFailure> for NotificationEvent {
	fn from(failure: &SessionFailure) -> Self {
		match failure {
			SessionFailure::Login { .. } => Self::LoginFailed,
			SessionFailure::Logout { .. } => Self::LogoutFailed,
			SessionFailure::MetadataRead { .. } => Self::MetadataReadFailed,
			SessionFailure::MetadataWrite { .. } => Self::MetadataWriteFailed,
		}
	}
}

/// Message queued for the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	/// Tone of the message.
	pub kind: NotificationKind,
	/// Triggering event.
	pub event: NotificationEvent,
	/// Rendered text.
	pub message: String,
	/// Collaborator error code, for failures that carry one.
	pub code: Option<u16>,
}
impl Notification {
	/// Builds a notification for `event`.
	pub fn new(event: NotificationEvent, message: impl Into<String>, code: Option<u16>) -> Self {
		Self { kind: event.kind(), event, message: message.into(), code }
	}

	/// Returns `true` for failure notifications.
	pub fn is_failure(&self) -> bool {
		matches!(self.kind, NotificationKind::Failure)
	}
}
