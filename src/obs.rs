//! Optional observability helpers for collaborator requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `metadata_session.request` with the
//!   `request` (kind) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `metadata_session_request_total` counter for every
//!   attempt/success/failure, labeled by `request` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Collaborator requests issued by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Interactive login.
	Login,
	/// Provider logout.
	Logout,
	/// Metadata fetch.
	MetadataRead,
	/// Metadata save.
	MetadataWrite,
	/// Profile picture download.
	ImageFetch,
}
impl RequestKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestKind::Login => "login",
			RequestKind::Logout => "logout",
			RequestKind::MetadataRead => "metadata_read",
			RequestKind::MetadataWrite => "metadata_write",
			RequestKind::ImageFetch => "image_fetch",
		}
	}
}
impl Display for RequestKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Request handed to the collaborator.
	Attempt,
	/// Collaborator resolved successfully.
	Success,
	/// Collaborator reported a failure.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
