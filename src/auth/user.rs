//! User identity decoded from an OIDC identity token.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, auth::AccessToken};

/// Errors raised while decoding an identity token into a [`User`].
#[derive(Debug, ThisError)]
pub enum IdTokenError {
	/// The token does not have the `header.payload.signature` shape.
	#[error("Identity token must contain three dot-separated segments.")]
	Malformed,
	/// The payload segment is not valid base64url.
	#[error("Identity token payload is not valid base64url.")]
	PayloadEncoding(#[source] base64::DecodeError),
	/// The payload is not a JSON claims object.
	#[error("Identity token claims could not be parsed.")]
	Claims(#[source] serde_path_to_error::Error<serde_json::Error>),
	/// The `sub` claim is absent or blank.
	#[error("Identity token is missing the subject claim.")]
	MissingSubject,
}

/// Login result delivered by the identity provider.
#[derive(Clone)]
pub struct Credentials {
	/// Encoded OIDC identity token.
	pub id_token: String,
	/// Bearer credential for the management API.
	pub access_token: AccessToken,
}
impl Credentials {
	/// Bundles an identity token with its access credential.
	pub fn new(id_token: impl Into<String>, access_token: impl Into<String>) -> Self {
		Self { id_token: id_token.into(), access_token: AccessToken::new(access_token) }
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("id_token", &"<redacted>")
			.field("access_token", &self.access_token)
			.finish()
	}
}

/// Identity projected from the claims of an identity token.
///
/// [`User::default`] is the empty instance that stands for "nobody is signed in".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Stable subject identifier (`sub`).
	pub id: String,
	/// Display name (`name`).
	pub name: String,
	/// Email address (`email`).
	pub email: String,
	/// Profile picture location (`picture`).
	pub picture_url: String,
}
impl User {
	/// Decodes the claims of an identity token.
	///
	/// The signature is not checked here; the login collaborator owns token validation.
	pub fn from_id_token(id_token: &str) -> Result<Self, IdTokenError> {
		let mut segments = id_token.split('.');
		let (Some(_header), Some(payload), Some(_signature), None) =
			(segments.next(), segments.next(), segments.next(), segments.next())
		else {
			return Err(IdTokenError::Malformed);
		};
		let bytes = URL_SAFE_NO_PAD
			.decode(payload.trim_end_matches('='))
			.map_err(IdTokenError::PayloadEncoding)?;
		let mut de = serde_json::Deserializer::from_slice(&bytes);
		let claims: IdTokenClaims =
			serde_path_to_error::deserialize(&mut de).map_err(IdTokenError::Claims)?;
		let id = claims.sub.unwrap_or_default();

		if id.trim().is_empty() {
			return Err(IdTokenError::MissingSubject);
		}

		Ok(Self {
			id,
			name: claims.name.unwrap_or_default(),
			email: claims.email.unwrap_or_default(),
			picture_url: claims.picture.unwrap_or_default(),
		})
	}

	/// Returns `true` for the empty instance.
	pub fn is_empty(&self) -> bool {
		self.id.is_empty()
	}
}

#[derive(Deserialize)]
struct IdTokenClaims {
	sub: Option<String>,
	name: Option<String>,
	email: Option<String>,
	picture: Option<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::fake_id_token;

	#[test]
	fn decodes_profile_claims() {
		let token = fake_id_token("auth0|42", "Ada", "ada@example.com", "https://example.com/a.png");
		let user = User::from_id_token(&token).expect("Fixture token should decode.");

		assert_eq!(user.id, "auth0|42");
		assert_eq!(user.name, "Ada");
		assert_eq!(user.email, "ada@example.com");
		assert_eq!(user.picture_url, "https://example.com/a.png");
		assert!(!user.is_empty());
	}

	#[test]
	fn missing_optional_claims_default_to_empty() {
		let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"user-1","name":null}"#);
		let user = User::from_id_token(&format!("h.{payload}.s"))
			.expect("Token with only a subject should decode.");

		assert_eq!(user.id, "user-1");
		assert!(user.name.is_empty());
		assert!(user.email.is_empty());
	}

	#[test]
	fn rejects_malformed_tokens() {
		assert!(matches!(User::from_id_token("not-a-jwt"), Err(IdTokenError::Malformed)));
		assert!(matches!(User::from_id_token("a.b.c.d"), Err(IdTokenError::Malformed)));
		assert!(matches!(User::from_id_token("a.!!!.c"), Err(IdTokenError::PayloadEncoding(_))));

		let not_json = URL_SAFE_NO_PAD.encode(b"[1,2]");

		assert!(matches!(
			User::from_id_token(&format!("h.{not_json}.s")),
			Err(IdTokenError::Claims(_))
		));

		let blank_sub = URL_SAFE_NO_PAD.encode(br#"{"sub":" "}"#);

		assert!(matches!(
			User::from_id_token(&format!("h.{blank_sub}.s")),
			Err(IdTokenError::MissingSubject)
		));
	}

	#[test]
	fn default_user_is_empty() {
		assert!(User::default().is_empty());
	}

	#[test]
	fn credentials_debug_redacts_tokens() {
		let credentials = Credentials::new("id.token.value", "tok123");
		let rendered = format!("{credentials:?}");

		assert!(!rendered.contains("tok123"));
		assert!(!rendered.contains("id.token.value"));
	}
}
