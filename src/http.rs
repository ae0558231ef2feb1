//! Remote calendar API contract and its reqwest transport.
//!
//! The connector depends on the remote service only through [`CalendarApi`]. Hosts embed the
//! crate with [`ReqwestCalendarApi`] (the default `reqwest` feature) or bring their own
//! implementation, e.g. a fake for tests or a binding to an existing SDK. Every failure is
//! normalized into [`ApiError`], whose `Display` output is shown to users verbatim.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::{RequestBuilder, header::AUTHORIZATION};
#[cfg(feature = "reqwest")] use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, calendar::Calendar};
#[cfg(feature = "reqwest")] use crate::config::{ApiKey, ConnectorConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`CalendarApi`] operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + 'a + Send>>;

/// Remote authorization and calendar service consumed by the connector.
pub trait CalendarApi
where
	Self: 'static + Send + Sync,
{
	/// Requests an authorization URL for `request.external_user_id`, redirecting back to
	/// `request.callback_url` once the provider finishes.
	fn get_auth_url(&self, request: AuthUrlRequest) -> ApiFuture<'_, AuthUrlResponse>;

	/// Fetches every calendar owned by `external_user_id`, in display order.
	fn calendars_by_user<'a>(
		&'a self,
		external_user_id: &'a str,
		options: ByUserOptions,
	) -> ApiFuture<'a, Vec<Calendar>>;
}

/// Payload for [`CalendarApi::get_auth_url`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlRequest {
	/// Identifier proposed for the account being connected.
	pub external_user_id: String,
	/// Callback page URL the provider redirects to.
	pub callback_url: String,
}

/// Response of [`CalendarApi::get_auth_url`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUrlResponse {
	/// Provider authorization URL the browser must navigate to.
	pub url: Url,
}

/// Options for [`CalendarApi::calendars_by_user`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByUserOptions {
	/// Asks the service to pull fresh data from the upstream provider before answering.
	pub sync: bool,
}
impl ByUserOptions {
	/// Options requesting a synchronization pass.
	pub const fn synced() -> Self {
		Self { sync: true }
	}
}

/// Failure reported by a [`CalendarApi`] implementation.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// The request never produced a response (DNS, TCP, TLS, ...).
	#[error("Network error occurred while calling the calendar API: {source}")]
	Transport {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The service answered with an error.
	#[error("{}", render_service_message(.message, .cause.as_ref()))]
	Service {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Service-supplied message.
		message: String,
		/// Structured cause attached by the service, if any.
		cause: Option<serde_json::Value>,
	},
	/// The service answered successfully with a body that could not be parsed.
	#[error("Calendar API returned malformed JSON at `{}`.", .source.path())]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The request payload could not be encoded; nothing was sent.
	#[error("Calendar API request could not be encoded: {source}")]
	RequestEncode {
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ApiError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ApiError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

fn render_service_message(message: &str, cause: Option<&serde_json::Value>) -> String {
	match cause {
		Some(cause) => format!("{message} ({cause})"),
		None => message.to_owned(),
	}
}

#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	cause: Option<serde_json::Value>,
}
impl ServiceErrorBody {
	fn into_error(self, status: u16) -> ApiError {
		let message = self.message.or(self.error).unwrap_or_else(|| format!("HTTP {status}"));

		ApiError::Service { status: Some(status), message, cause: self.cause }
	}
}

/// reqwest-backed [`CalendarApi`] speaking the calendar service's JSON protocol.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestCalendarApi {
	client: ReqwestClient,
	base_url: Url,
	api_key: ApiKey,
}
#[cfg(feature = "reqwest")]
impl ReqwestCalendarApi {
	/// Builds a transport with a default reqwest client.
	pub fn new(config: &ConnectorConfig) -> Self {
		Self::with_client(ReqwestClient::default(), config)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, config: &ConnectorConfig) -> Self {
		Self { client, base_url: config.base_url.clone(), api_key: config.api_key.clone() }
	}

	// The base URL is checked by `ConnectorConfigBuilder::build`.
	fn endpoint(&self, segments: &[&str]) -> Url {
		let mut url = self.base_url.clone();

		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}

		url
	}

	async fn send<T>(&self, request: RequestBuilder) -> Result<T, ApiError>
	where
		T: DeserializeOwned,
	{
		let response = request
			.header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose()))
			.send()
			.await?;
		let status = response.status();
		let bytes = response.bytes().await?;

		if !status.is_success() {
			let body: ServiceErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();

			return Err(body.into_error(status.as_u16()));
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ApiError::ResponseParse { source })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestCalendarApi {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestCalendarApi {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestCalendarApi")
			.field("base_url", &self.base_url.as_str())
			.field("api_key", &self.api_key)
			.finish()
	}
}
#[cfg(feature = "reqwest")]
impl CalendarApi for ReqwestCalendarApi {
	fn get_auth_url(&self, request: AuthUrlRequest) -> ApiFuture<'_, AuthUrlResponse> {
		Box::pin(async move {
			let url = self.endpoint(&["google", "auth-url"]);
			let body = serde_json::to_vec(&request)
				.map_err(|source| ApiError::RequestEncode { source })?;
			let builder = self
				.client
				.post(url)
				.header(reqwest::header::CONTENT_TYPE, "application/json")
				.body(body);

			self.send(builder).await
		})
	}

	fn calendars_by_user<'a>(
		&'a self,
		external_user_id: &'a str,
		options: ByUserOptions,
	) -> ApiFuture<'a, Vec<Calendar>> {
		Box::pin(async move {
			let mut url = self.endpoint(&["calendars", "by-user", external_user_id]);

			if options.sync {
				url.query_pairs_mut().append_pair("sync", "true");
			}

			self.send(self.client.get(url)).await
		})
	}
}
