//! Client configuration and user-visible texts.

// self
use crate::{
	_prelude::*,
	collab::{LoginRequest, LogoutRequest},
};

/// Scopes needed to read the profile and update the user's own metadata.
pub const DEFAULT_SCOPE: &str =
	"openid profile email read:current_user update:current_user_metadata";

/// Errors raised while building or loading configuration.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required field was not supplied.
	#[error("Missing required field `{field}`.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
	},
	/// A field contains whitespace where none is allowed.
	#[error("Field `{field}` must not contain whitespace.")]
	ContainsWhitespace {
		/// Name of the offending field.
		field: &'static str,
	},
	/// The tenant domain cannot be turned into an HTTPS URL.
	#[error("Domain `{domain}` is not a valid host.")]
	InvalidDomain {
		/// Domain that failed validation.
		domain: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configuration JSON could not be parsed.
	#[error("Configuration could not be parsed.")]
	Parse(#[from] serde_path_to_error::Error<serde_json::Error>),
}

/// Validated identity-provider client settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClientConfigBuilder", into = "ClientConfigBuilder")]
pub struct ClientConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// Tenant domain, e.g. `tenant.example.com`.
	pub domain: String,
	/// Custom URL scheme used for login and logout redirects.
	pub scheme: String,
	/// Space-delimited scopes requested at login.
	pub scope: String,
	base_url: Url,
}
impl ClientConfig {
	/// Returns a builder seeded with [`DEFAULT_SCOPE`].
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Parses a JSON document into a validated configuration.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);
		let builder: ClientConfigBuilder = serde_path_to_error::deserialize(&mut de)?;

		builder.build()
	}

	/// HTTPS root of the tenant.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Management API audience (`https://{domain}/api/v2/`).
	pub fn audience(&self) -> Url {
		let mut url = self.base_url.clone();

		url.set_path("/api/v2/");

		url
	}

	/// Builds the parameters for an interactive login.
	pub fn login_request(&self) -> LoginRequest {
		LoginRequest { scheme: self.scheme.clone(), audience: self.audience(), scope: self.scope.clone() }
	}

	/// Builds the parameters for a logout.
	pub fn logout_request(&self) -> LogoutRequest {
		LogoutRequest { scheme: self.scheme.clone() }
	}
}
impl TryFrom<ClientConfigBuilder> for ClientConfig {
	type Error = ConfigError;

	fn try_from(builder: ClientConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

/// Builder for [`ClientConfig`]; also the serialized shape of the configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigBuilder {
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// Tenant domain.
	pub domain: Option<String>,
	/// Redirect scheme.
	pub scheme: Option<String>,
	/// Requested scopes.
	pub scope: String,
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self { client_id: None, domain: None, scheme: None, scope: DEFAULT_SCOPE.into() }
	}
}
impl ClientConfigBuilder {
	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the tenant domain.
	pub fn domain(mut self, value: impl Into<String>) -> Self {
		self.domain = Some(value.into());

		self
	}

	/// Sets the redirect scheme.
	pub fn scheme(mut self, value: impl Into<String>) -> Self {
		self.scheme = Some(value.into());

		self
	}

	/// Replaces the requested scopes.
	pub fn scope(mut self, value: impl Into<String>) -> Self {
		self.scope = value.into();

		self
	}

	/// Validates the collected fields and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let client_id = required("client_id", self.client_id)?;
		let domain = required("domain", self.domain)?;
		let scheme = required("scheme", self.scheme)?;
		let base_url = Url::parse(&format!("https://{domain}/"))
			.map_err(|source| ConfigError::InvalidDomain { domain: domain.clone(), source })?;

		if base_url.path() != "/" || base_url.query().is_some() {
			return Err(ConfigError::InvalidDomain {
				domain,
				source: url::ParseError::InvalidDomainCharacter,
			});
		}

		let scope = self.scope.split_whitespace().collect::<Vec<_>>().join(" ");

		Ok(ClientConfig { client_id, domain, scheme, scope, base_url })
	}
}
impl From<ClientConfig> for ClientConfigBuilder {
	fn from(config: ClientConfig) -> Self {
		Self {
			client_id: Some(config.client_id),
			domain: Some(config.domain),
			scheme: Some(config.scheme),
			scope: config.scope,
		}
	}
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	let value = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
	let value = value.ok_or(ConfigError::MissingField { field })?;

	if value.chars().any(char::is_whitespace) {
		return Err(ConfigError::ContainsWhitespace { field });
	}

	Ok(value)
}

/// Titles and notification templates shown to the user.
///
/// Templates accept `{name}` (login success) and `{code}` (failures) placeholders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTexts {
	/// Title shown on the very first render.
	pub initial_title: String,
	/// Title shown while a user is signed in.
	pub logged_in_title: String,
	/// Title shown after the user signs out.
	pub logged_out_title: String,
	/// Notification after a successful login.
	pub login_success: String,
	/// Notification after a cancelled or failed login.
	pub login_failure: String,
	/// Notification after any other failed request.
	pub general_failure: String,
	/// Notification after metadata is saved.
	pub general_success: String,
}
impl SessionTexts {
	/// Renders the login success template for `name`.
	pub fn login_success_message(&self, name: &str) -> String {
		self.login_success.replace("{name}", name)
	}

	/// Renders the general failure template for `code`.
	pub fn failure_message(&self, code: Option<u16>) -> String {
		let code = code.map_or_else(|| "unknown".to_owned(), |c| c.to_string());

		self.general_failure.replace("{code}", &code)
	}
}
impl Default for SessionTexts {
	fn default() -> Self {
		Self {
			initial_title: "Welcome!".into(),
			logged_in_title: "You're logged in.".into(),
			logged_out_title: "You're logged out.".into(),
			login_success: "Welcome, {name}!".into(),
			login_failure: "Login failed.".into(),
			general_failure: "Something went wrong (code {code}).".into(),
			general_success: "Saved!".into(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> ClientConfigBuilder {
		ClientConfig::builder().client_id("client-1").domain("tenant.example.com").scheme("demo")
	}

	#[test]
	fn builder_derives_audience_and_requests() {
		let config = builder().build().expect("Config fixture should build.");

		assert_eq!(config.base_url().as_str(), "https://tenant.example.com/");
		assert_eq!(config.audience().as_str(), "https://tenant.example.com/api/v2/");

		let login = config.login_request();

		assert_eq!(login.scheme, "demo");
		assert_eq!(login.audience, config.audience());
		assert_eq!(login.scope, DEFAULT_SCOPE);
		assert_eq!(config.logout_request().scheme, "demo");
	}

	#[test]
	fn builder_rejects_missing_and_invalid_fields() {
		let err = ClientConfig::builder()
			.domain("tenant.example.com")
			.scheme("demo")
			.build()
			.expect_err("Missing client id should fail.");

		assert!(matches!(err, ConfigError::MissingField { field: "client_id" }));

		let err = builder().scheme("   ").build().expect_err("Blank scheme should fail.");

		assert!(matches!(err, ConfigError::MissingField { field: "scheme" }));

		let err = builder().client_id("a b").build().expect_err("Whitespace should fail.");

		assert!(matches!(err, ConfigError::ContainsWhitespace { field: "client_id" }));

		let err = builder().domain("tenant.example.com/path").build().expect_err("Paths should fail.");

		assert!(matches!(err, ConfigError::InvalidDomain { .. }));
	}

	#[test]
	fn scope_is_normalized() {
		let config = builder().scope("  openid   profile ").build().expect("Config should build.");

		assert_eq!(config.scope, "openid profile");
	}

	#[test]
	fn json_loading_validates_and_round_trips() {
		let config = ClientConfig::from_json_str(
			r#"{"client_id":"client-1","domain":"tenant.example.com","scheme":"demo"}"#,
		)
		.expect("JSON config should load.");

		assert_eq!(config.scope, DEFAULT_SCOPE);

		let json = serde_json::to_string(&config).expect("Config should serialize.");
		let reloaded = ClientConfig::from_json_str(&json).expect("Serialized config should load.");

		assert_eq!(reloaded, config);

		let err = ClientConfig::from_json_str(r#"{"client_id":7}"#)
			.expect_err("Wrongly typed fields should fail.");

		assert!(matches!(err, ConfigError::Parse(ref e) if e.path().to_string() == "client_id"));
		assert!(matches!(
			ClientConfig::from_json_str(r#"{"client_id":"c"}"#),
			Err(ConfigError::MissingField { field: "domain" })
		));
	}

	#[test]
	fn texts_render_placeholders() {
		let texts = SessionTexts::default();

		assert_eq!(texts.login_success_message("Ada"), "Welcome, Ada!");
		assert_eq!(texts.failure_message(Some(401)), "Something went wrong (code 401).");
		assert_eq!(texts.failure_message(None), "Something went wrong (code unknown).");

		let custom: SessionTexts = serde_json::from_str(r#"{"initial_title":"Hi"}"#)
			.expect("Partial texts should deserialize.");

		assert_eq!(custom.initial_title, "Hi");
		assert_eq!(custom.logged_in_title, SessionTexts::default().logged_in_title);
	}
}
