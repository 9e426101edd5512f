//! Collaborator failure taxonomy.
//!
//! Local parse and validation errors live next to the code that raises them
//! ([`ConfigError`](crate::config::ConfigError), [`IdTokenError`](crate::auth::IdTokenError),
//! [`MetadataError`](crate::metadata::MetadataError)); this module covers what the session does
//! with collaborator failures.

// self
use crate::_prelude::*;

/// Failures reported by asynchronous collaborators.
///
/// None of these propagate past the session view model; each one becomes a transient
/// notification and a defined phase rollback.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SessionFailure {
	/// Login was cancelled or rejected.
	#[error("Login failed: {reason}.")]
	Login {
		/// Collaborator-supplied reason string.
		reason: String,
	},
	/// Logout could not be completed.
	#[error("Logout failed with code {}.", display_code(.code))]
	Logout {
		/// Collaborator error code, when available.
		code: Option<u16>,
	},
	/// Metadata could not be fetched.
	#[error("Metadata read failed with code {}.", display_code(.code))]
	MetadataRead {
		/// Collaborator error code, when available.
		code: Option<u16>,
	},
	/// Metadata could not be saved.
	#[error("Metadata write failed with code {}.", display_code(.code))]
	MetadataWrite {
		/// Collaborator error code, when available.
		code: Option<u16>,
	},
}
impl SessionFailure {
	/// Returns the collaborator error code carried by the failure, if any.
	pub fn code(&self) -> Option<u16> {
		match self {
			Self::Login { .. } => None,
			Self::Logout { code } | Self::MetadataRead { code } | Self::MetadataWrite { code } =>
				*code,
		}
	}
}

fn display_code(code: &Option<u16>) -> String {
	code.map_or_else(|| "unknown".into(), |c| c.to_string())
}
