//! Starts a Google sign-in against a mocked calendar API and prints where the browser would go.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use calendar_connect::{
	config::ConnectorConfig,
	flows::{ReqwestConnector, SignInOutcome},
	nav::RecordingNavigator,
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _auth_url = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/google/auth-url");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"url\":\"https://accounts.google.com/o/oauth2/v2/auth?state=demo\"}");
		})
		.await;
	let config = ConnectorConfig::builder()
		.api_key("demo-key")
		.base_url(Url::parse(&server.url("/api/v1"))?)
		.origin(Url::parse("http://localhost:5175")?)
		.build()?;
	let navigator = Arc::new(RecordingNavigator::default());
	let connector =
		ReqwestConnector::new(config, Arc::new(MemoryStore::default()), navigator.clone())?;

	match connector.start_sign_in().await? {
		SignInOutcome::Redirecting { request, authorize_url } => {
			println!("Proposed external user id: {}.", request.proposed_user_id);
			println!("Provider will return to {}.", request.callback_url);
			println!("Send the browser to {authorize_url}.");
		},
		SignInOutcome::AlreadySigningIn => println!("A sign-in attempt is already in flight."),
	}

	println!("Recorded navigations: {:?}.", navigator.history());

	Ok(())
}
