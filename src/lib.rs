//! Headless core for browser calendar front-ends: OAuth redirect sign-in, a durable session
//! identity that survives the redirect round-trip, and calendar loading that never applies a
//! stale response.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod nav;
pub mod obs;
pub mod session;
pub mod store;
pub mod view;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		calendar::{Calendar, CalendarId},
		config::ConnectorConfig,
		flows::Connector,
		http::{ApiError, ApiFuture, AuthUrlRequest, AuthUrlResponse, ByUserOptions, CalendarApi},
		nav::RecordingNavigator,
		store::{MemoryStore, SessionStore},
	};

	/// Builds a calendar fixture without events.
	pub fn calendar(id: &str) -> Calendar {
		Calendar {
			id: CalendarId::new(id),
			name: format!("Calendar {id}"),
			timezone: "UTC".into(),
			events: Vec::new(),
		}
	}

	/// Builds a configuration rooted at `http://localhost:5175` with a placeholder API key.
	pub fn test_config() -> ConnectorConfig {
		ConnectorConfig::builder()
			.api_key("test-key")
			.origin(Url::parse("http://localhost:5175").expect("Test origin should parse."))
			.build()
			.expect("Test configuration should build.")
	}

	/// Remote API fake that answers every call immediately from scripted queues.
	#[derive(Debug, Default)]
	pub struct ScriptedCalendarApi {
		auth_urls: Mutex<Vec<Result<AuthUrlResponse, ApiError>>>,
		calendars: Mutex<Vec<Result<Vec<Calendar>, ApiError>>>,
		auth_requests: Mutex<Vec<AuthUrlRequest>>,
		by_user_calls: Mutex<Vec<(String, ByUserOptions)>>,
	}
	impl ScriptedCalendarApi {
		/// Queues a response for the next `get_auth_url` call.
		pub fn push_auth_url(&self, response: Result<AuthUrlResponse, ApiError>) {
			self.auth_urls.lock().push(response);
		}

		/// Queues a response for the next `calendars_by_user` call.
		pub fn push_calendars(&self, response: Result<Vec<Calendar>, ApiError>) {
			self.calendars.lock().push(response);
		}

		/// Authorization requests observed so far.
		pub fn auth_requests(&self) -> Vec<AuthUrlRequest> {
			self.auth_requests.lock().clone()
		}

		/// Calendar requests observed so far.
		pub fn by_user_calls(&self) -> Vec<(String, ByUserOptions)> {
			self.by_user_calls.lock().clone()
		}
	}
	impl CalendarApi for ScriptedCalendarApi {
		fn get_auth_url(&self, request: AuthUrlRequest) -> ApiFuture<'_, AuthUrlResponse> {
			self.auth_requests.lock().push(request);

			let next = {
				let mut queue = self.auth_urls.lock();

				if queue.is_empty() { None } else { Some(queue.remove(0)) }
			};

			Box::pin(async move {
				next.unwrap_or_else(|| {
					Err(ApiError::Service {
						status: None,
						message: "No scripted auth URL.".into(),
						cause: None,
					})
				})
			})
		}

		fn calendars_by_user<'a>(
			&'a self,
			external_user_id: &'a str,
			options: ByUserOptions,
		) -> ApiFuture<'a, Vec<Calendar>> {
			self.by_user_calls.lock().push((external_user_id.to_owned(), options));

			let next = {
				let mut queue = self.calendars.lock();

				if queue.is_empty() { None } else { Some(queue.remove(0)) }
			};

			Box::pin(async move {
				next.unwrap_or_else(|| {
					Err(ApiError::Service {
						status: None,
						message: "No scripted calendars.".into(),
						cause: None,
					})
				})
			})
		}
	}

	/// Connector wired to a scripted API, an in-memory store, and a recording navigator.
	pub type ScriptedConnector = Connector<ScriptedCalendarApi>;

	/// Builds a [`ScriptedConnector`] and hands back its collaborators for assertions.
	pub fn scripted_connector()
	-> (ScriptedConnector, Arc<ScriptedCalendarApi>, Arc<MemoryStore>, Arc<RecordingNavigator>) {
		let api = Arc::new(ScriptedCalendarApi::default());
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let navigator = Arc::new(RecordingNavigator::default());
		let connector = Connector::with_api(test_config(), store, api.clone(), navigator.clone())
			.expect("Scripted connector should build.");

		(connector, api, store_backend, navigator)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
