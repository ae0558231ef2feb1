//! Connector configuration and its validating builder.

// std
use std::env;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	obs::{self, FlowKind},
};

/// Environment variable holding the remote API key.
pub const API_KEY_ENV: &str = "BUILDCALENDAR_API_KEY";
/// Environment variable overriding the remote API base URL.
pub const BASE_URL_ENV: &str = "BUILDCALENDAR_BASE_URL";
/// Environment variable holding the application origin.
pub const ORIGIN_ENV: &str = "BUILDCALENDAR_APP_ORIGIN";
/// Default remote API base URL.
pub const DEFAULT_BASE_URL: &str = "https://buildcalendar.com/api/v1";
/// Default path of the dedicated callback page.
pub const DEFAULT_CALLBACK_PATH: &str = "/google/callback";
/// Default delay before the callback page returns to the application root.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::seconds(2);

/// Redacted API key wrapper keeping the credential out of logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps a new key.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner key. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when no key was configured.
	pub fn is_empty(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Immutable configuration consumed by the connector.
#[derive(Clone, Debug)]
pub struct ConnectorConfig {
	/// Remote API key; may be empty, in which case the view shows a warning.
	pub api_key: ApiKey,
	/// Remote API base URL.
	pub base_url: Url,
	/// Origin the application is served from.
	pub origin: Url,
	/// Path of the dedicated callback page.
	pub callback_path: String,
	/// Delay before the callback page returns to the application root.
	pub redirect_delay: Duration,
}
impl ConnectorConfig {
	/// Creates a new builder.
	pub fn builder() -> ConnectorConfigBuilder {
		ConnectorConfigBuilder::default()
	}

	/// Builds a configuration from `BUILDCALENDAR_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder();

		match env::var(API_KEY_ENV) {
			Ok(key) => builder = builder.api_key(key),
			Err(_) => obs::record_warning(
				FlowKind::SignIn,
				&format!("{API_KEY_ENV} is not set; remote calls will be rejected."),
			),
		}

		if let Ok(raw) = env::var(BASE_URL_ENV) {
			let url = Url::parse(&raw)
				.map_err(|source| ConfigError::InvalidUrl { field: "base", source })?;

			builder = builder.base_url(url);
		}

		let raw_origin = env::var(ORIGIN_ENV).map_err(|_| ConfigError::MissingOrigin)?;
		let origin = Url::parse(&raw_origin)
			.map_err(|source| ConfigError::InvalidUrl { field: "origin", source })?;

		builder.origin(origin).build()
	}

	/// Callback URL handed to the authorization service: origin joined with the callback path.
	pub fn callback_url(&self) -> Result<Url, ConfigError> {
		self.origin
			.join(&self.callback_path)
			.map_err(|source| ConfigError::InvalidUrl { field: "callback", source })
	}

	/// Root URL of the application.
	pub fn root_url(&self) -> Url {
		let mut root = self.origin.clone();

		root.set_path("/");
		root.set_query(None);
		root.set_fragment(None);

		root
	}

	/// Returns `true` when the API key is missing.
	pub fn api_key_missing(&self) -> bool {
		self.api_key.is_empty()
	}
}

/// Builder for [`ConnectorConfig`] values.
#[derive(Debug, Default)]
pub struct ConnectorConfigBuilder {
	/// Remote API key.
	pub api_key: ApiKey,
	/// Optional base URL override.
	pub base_url: Option<Url>,
	/// Application origin (required).
	pub origin: Option<Url>,
	/// Optional callback path override.
	pub callback_path: Option<String>,
	/// Optional redirect delay override.
	pub redirect_delay: Option<Duration>,
}
impl ConnectorConfigBuilder {
	/// Sets the API key.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = ApiKey::new(key);

		self
	}

	/// Overrides the remote API base URL, e.g. for local development.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Sets the application origin.
	pub fn origin(mut self, url: Url) -> Self {
		self.origin = Some(url);

		self
	}

	/// Overrides the callback path.
	pub fn callback_path(mut self, path: impl Into<String>) -> Self {
		self.callback_path = Some(path.into());

		self
	}

	/// Overrides the delay before the callback page returns to the root.
	pub fn redirect_delay(mut self, delay: Duration) -> Self {
		self.redirect_delay = Some(delay);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ConnectorConfig, ConfigError> {
		let origin = self.origin.ok_or(ConfigError::MissingOrigin)?;
		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL)
				.map_err(|source| ConfigError::InvalidUrl { field: "base", source })?,
		};
		let callback_path = self.callback_path.unwrap_or_else(|| DEFAULT_CALLBACK_PATH.into());
		let redirect_delay = self.redirect_delay.unwrap_or(DEFAULT_REDIRECT_DELAY);

		validate_base("origin", &origin)?;
		validate_base("base", &base_url)?;

		if !callback_path.starts_with('/') {
			return Err(ConfigError::InvalidCallbackPath { path: callback_path });
		}
		if redirect_delay.is_negative() {
			return Err(ConfigError::NegativeRedirectDelay);
		}

		let config =
			ConnectorConfig { api_key: self.api_key, base_url, origin, callback_path, redirect_delay };

		config.callback_url()?;

		Ok(config)
	}
}

fn validate_base(field: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.cannot_be_a_base() {
		Err(ConfigError::NotABase { field, url: url.to_string() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn origin() -> Url {
		Url::parse("http://localhost:5175").expect("Origin fixture should parse.")
	}

	#[test]
	fn defaults_apply() {
		let config = ConnectorConfig::builder()
			.api_key("key")
			.origin(origin())
			.build()
			.expect("Configuration should build.");

		assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
		assert_eq!(config.callback_path, DEFAULT_CALLBACK_PATH);
		assert_eq!(config.redirect_delay, Duration::seconds(2));
		assert_eq!(
			config.callback_url().expect("Callback URL should join.").as_str(),
			"http://localhost:5175/google/callback"
		);
		assert_eq!(config.root_url().as_str(), "http://localhost:5175/");
		assert!(!config.api_key_missing());
	}

	#[test]
	fn builder_rejects_invalid_values() {
		assert!(matches!(ConnectorConfig::builder().build(), Err(ConfigError::MissingOrigin)));
		assert!(matches!(
			ConnectorConfig::builder().origin(origin()).callback_path("callback").build(),
			Err(ConfigError::InvalidCallbackPath { .. })
		));
		assert!(matches!(
			ConnectorConfig::builder()
				.origin(origin())
				.redirect_delay(Duration::seconds(-1))
				.build(),
			Err(ConfigError::NegativeRedirectDelay)
		));
		assert!(matches!(
			ConnectorConfig::builder()
				.origin(Url::parse("mailto:someone@example.com").expect("Mailto URL should parse."))
				.build(),
			Err(ConfigError::NotABase { field: "origin", .. })
		));
		assert!(matches!(
			ConnectorConfig::builder().origin(origin()).callback_path("//[x").build(),
			Err(ConfigError::InvalidUrl { field: "callback", .. })
		));
	}

	#[test]
	fn api_key_is_redacted_and_missing_is_detected() {
		let config = ConnectorConfig::builder()
			.api_key("  ")
			.origin(origin())
			.build()
			.expect("Blank keys are allowed.");

		assert!(config.api_key_missing());

		let key = ApiKey::new("secret");

		assert_eq!(format!("{key:?}"), "ApiKey(\"<redacted>\")");
		assert_eq!(format!("{key}"), "<redacted>");
	}
}
