//! Typed view of the profile metadata document.
//!
//! The management API returns loosely typed `user_metadata` and `app_metadata` maps. They are
//! parsed here once, with absent or `null` fields falling back to an empty string or `false`,
//! so the session never inspects raw JSON.

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

/// Errors raised while parsing a metadata document.
#[derive(Debug, ThisError)]
pub enum MetadataError {
	/// The document is not the expected JSON shape.
	#[error("Profile metadata could not be parsed.")]
	Parse(#[from] serde_path_to_error::Error<serde_json::Error>),
}

/// Metadata fetched for the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileMetadata {
	/// The user's personal affirmation (per-user metadata).
	pub personal_affirmation: String,
	/// Announcement fields (application-level metadata).
	pub announcement: AnnouncementCandidate,
}
impl ProfileMetadata {
	/// Creates metadata from an affirmation and an announcement candidate.
	pub fn new(personal_affirmation: impl Into<String>, announcement: AnnouncementCandidate) -> Self {
		Self { personal_affirmation: personal_affirmation.into(), announcement }
	}

	/// Parses a management API user profile document.
	pub fn from_profile_json(bytes: &[u8]) -> Result<Self, MetadataError> {
		let mut de = serde_json::Deserializer::from_slice(bytes);
		let profile: ProfileDocument = serde_path_to_error::deserialize(&mut de)?;

		Ok(Self {
			personal_affirmation: profile.user_metadata.personal_affirmation,
			announcement: AnnouncementCandidate {
				display: profile.app_metadata.display_announcement,
				text: profile.app_metadata.announcement_text,
				url: profile.app_metadata.announcement_url,
			},
		})
	}
}

/// Raw announcement fields as stored in application metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnouncementCandidate {
	/// Whether the application enabled the announcement.
	pub display: bool,
	/// Button text.
	pub text: String,
	/// Link opened by the button.
	pub url: String,
}
impl AnnouncementCandidate {
	/// Candidate with the display flag set.
	pub fn displayed(text: impl Into<String>, url: impl Into<String>) -> Self {
		Self { display: true, text: text.into(), url: url.into() }
	}

	/// Resolves the candidate into an [`Announcement`].
	///
	/// Yields `None` unless the display flag is set and both fields are non-empty. Both values
	/// are passed through untouched; opening the link is left to the host.
	pub fn resolve(&self) -> Option<Announcement> {
		if !self.display || self.text.is_empty() || self.url.is_empty() {
			return None;
		}

		Some(Announcement { text: self.text.clone(), url: self.url.clone() })
	}
}

/// Broadcast message with a link, ready to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
	/// Button text.
	pub text: String,
	/// Link opened by the button, exactly as stored.
	pub url: String,
}

/// Payload merged into the user's metadata on save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataUpdate {
	/// New personal affirmation, already trimmed.
	pub personal_affirmation: String,
}
impl MetadataUpdate {
	/// Creates an update with the trimmed affirmation text.
	pub fn affirmation(text: &str) -> Self {
		Self { personal_affirmation: text.trim().to_owned() }
	}

	/// Serializes the management API request body (`{"user_metadata": {...}}`).
	pub fn to_request_body(&self) -> serde_json::Value {
		serde_json::json!({ "user_metadata": self })
	}
}

#[derive(Deserialize)]
struct ProfileDocument {
	#[serde(default, deserialize_with = "null_as_default")]
	user_metadata: UserMetadata,
	#[serde(default, deserialize_with = "null_as_default")]
	app_metadata: AppMetadata,
}

#[derive(Default, Deserialize)]
struct UserMetadata {
	#[serde(default, deserialize_with = "null_as_default")]
	personal_affirmation: String,
}

#[derive(Default, Deserialize)]
struct AppMetadata {
	#[serde(default, deserialize_with = "null_as_default")]
	display_announcement: bool,
	#[serde(default, deserialize_with = "null_as_default")]
	announcement_text: String,
	#[serde(default, deserialize_with = "null_as_default")]
	announcement_url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_full_profile_document() {
		let metadata = ProfileMetadata::from_profile_json(
			br#"{
				"user_id": "auth0|1",
				"user_metadata": {"personal_affirmation": "I am enough", "theme": "dark"},
				"app_metadata": {
					"display_announcement": true,
					"announcement_text": "New release",
					"announcement_url": "https://example.com/news"
				}
			}"#,
		)
		.expect("Profile fixture should parse.");

		assert_eq!(metadata.personal_affirmation, "I am enough");
		assert_eq!(
			metadata.announcement.resolve(),
			Some(Announcement {
				text: "New release".into(),
				url: "https://example.com/news".into(),
			})
		);
	}

	#[test]
	fn absent_and_null_fields_use_defaults() {
		let metadata = ProfileMetadata::from_profile_json(br#"{"app_metadata": null}"#)
			.expect("Sparse profile should parse.");

		assert_eq!(metadata, ProfileMetadata::default());

		let metadata = ProfileMetadata::from_profile_json(
			br#"{"user_metadata": {"personal_affirmation": null}, "app_metadata": {}}"#,
		)
		.expect("Null affirmation should parse.");

		assert!(metadata.personal_affirmation.is_empty());
		assert!(!metadata.announcement.display);
	}

	#[test]
	fn wrongly_typed_fields_report_their_path() {
		let err = ProfileMetadata::from_profile_json(
			br#"{"app_metadata": {"display_announcement": "yes"}}"#,
		)
		.expect_err("String flag should be rejected.");
		let MetadataError::Parse(inner) = err;

		assert!(inner.path().to_string().ends_with("display_announcement"));
	}

	#[test]
	fn announcement_requires_flag_text_and_url() {
		assert!(AnnouncementCandidate::displayed("", "http://a").resolve().is_none());
		assert!(AnnouncementCandidate::displayed("News", "").resolve().is_none());
		assert!(
			AnnouncementCandidate { display: false, text: "News".into(), url: "http://a".into() }
				.resolve()
				.is_none()
		);
		assert!(AnnouncementCandidate::displayed("News", "http://a").resolve().is_some());
	}

	#[test]
	fn announcement_keeps_stored_values_verbatim() {
		assert_eq!(
			AnnouncementCandidate::displayed("News", "example.com/news").resolve(),
			Some(Announcement { text: "News".into(), url: "example.com/news".into() })
		);
		assert_eq!(
			AnnouncementCandidate::displayed("  News ", "https://a").resolve().map(|a| a.text),
			Some("  News ".into())
		);
	}

	#[test]
	fn update_trims_and_wraps_body() {
		let update = MetadataUpdate::affirmation("  hello ");

		assert_eq!(update.personal_affirmation, "hello");
		assert_eq!(
			update.to_request_body(),
			serde_json::json!({"user_metadata": {"personal_affirmation": "hello"}})
		);
	}
}
