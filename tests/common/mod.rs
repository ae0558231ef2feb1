//! Shared fakes for integration tests.

#![allow(dead_code)]

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use tokio::sync::oneshot;
use url::Url;
// self
use calendar_connect::{
	auth::ExternalUserId,
	calendar::{Calendar, CalendarId},
	config::ConnectorConfig,
	flows::Connector,
	http::{ApiError, ApiFuture, AuthUrlRequest, AuthUrlResponse, ByUserOptions, CalendarApi},
	nav::RecordingNavigator,
	store::{MemoryStore, SessionStore},
};

pub type CalendarsReply = Result<Vec<Calendar>, ApiError>;

pub fn calendar(id: &str) -> Calendar {
	Calendar {
		id: CalendarId::new(id),
		name: format!("Calendar {id}"),
		timezone: "UTC".into(),
		events: Vec::new(),
	}
}

pub fn user(id: &str) -> ExternalUserId {
	ExternalUserId::new(id).expect("Identifier fixture should be valid.")
}

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("URL fixture should parse.")
}

pub fn config() -> ConnectorConfig {
	ConnectorConfig::builder()
		.api_key("test-key")
		.origin(url("http://localhost:5175"))
		.build()
		.expect("Test configuration should build.")
}

/// Calendar API whose calendar responses are released by the test, one gate per identity.
///
/// A call for an identity without a gate fails immediately.
#[derive(Debug, Default)]
pub struct GatedCalendarApi {
	gates: parking_lot::Mutex<HashMap<String, oneshot::Receiver<CalendarsReply>>>,
}
impl GatedCalendarApi {
	/// Registers a gate for the next call made for `external_user_id`.
	pub fn gate(&self, external_user_id: &str) -> oneshot::Sender<CalendarsReply> {
		let (tx, rx) = oneshot::channel();

		self.gates.lock().insert(external_user_id.to_owned(), rx);

		tx
	}
}
impl CalendarApi for GatedCalendarApi {
	fn get_auth_url(&self, _request: AuthUrlRequest) -> ApiFuture<'_, AuthUrlResponse> {
		Box::pin(async {
			Err(ApiError::Service { status: Some(501), message: "Not scripted".into(), cause: None })
		})
	}

	fn calendars_by_user<'a>(
		&'a self,
		external_user_id: &'a str,
		_options: ByUserOptions,
	) -> ApiFuture<'a, Vec<Calendar>> {
		let gate = self.gates.lock().remove(external_user_id);

		Box::pin(async move {
			let Some(gate) = gate else {
				return Err(ApiError::Service { status: Some(404), message: "No gate".into(), cause: None });
			};

			gate.await.unwrap_or_else(|_| {
				Err(ApiError::Service { status: None, message: "Gate dropped".into(), cause: None })
			})
		})
	}
}

pub fn gated_connector(
	store: Arc<dyn SessionStore>,
) -> (Connector<GatedCalendarApi>, Arc<GatedCalendarApi>, Arc<RecordingNavigator>) {
	let api = Arc::new(GatedCalendarApi::default());
	let navigator = Arc::new(RecordingNavigator::default());
	let connector = Connector::with_api(config(), store, api.clone(), navigator.clone())
		.expect("Gated connector should build.");

	(connector, api, navigator)
}

pub fn memory_store() -> Arc<MemoryStore> {
	Arc::new(MemoryStore::default())
}
