//! Drives the callback page, the delayed return to the root page, and the first calendar load.
//!
//! Each page gets its own connector over the same store, the way a full navigation discards the
//! departing page's memory.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use url::Url;
// self
use calendar_connect::{
	config::ConnectorConfig,
	flows::ReqwestConnector,
	nav::RecordingNavigator,
	store::{FileStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _calendars = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/calendars/by-user/user_demo").query_param("sync", "true");
			then.status(200).header("content-type", "application/json").body(
				r#"[{"id":"primary","name":"Demo","timezone":"UTC","events":[{"id":"e1","title":"Kickoff","start":"2026-10-19T09:00:00Z","end":"2026-10-19T10:00:00Z"}]}]"#,
			);
		})
		.await;
	let config = ConnectorConfig::builder()
		.api_key("demo-key")
		.base_url(Url::parse(&server.url("/api/v1"))?)
		.origin(Url::parse("http://localhost:5175")?)
		.build()?;
	let store_path = env::temp_dir().join("calendar_connect_demo_session.json");
	let store: Arc<dyn SessionStore> = Arc::new(FileStore::open(&store_path)?);
	let callback_navigator = Arc::new(RecordingNavigator::default());
	let callback_page =
		ReqwestConnector::new(config.clone(), store.clone(), callback_navigator.clone())?;
	let page = callback_page.open_callback(&Url::parse(
		"http://localhost:5175/google/callback?success=true&external_user_id=user_demo",
	)?)?;

	println!("{}: {}", page.status.heading(), page.message);

	let redirect = page.redirect.ok_or_else(|| eyre!("Callback did not schedule a redirect."))?;

	tokio::time::sleep(std::time::Duration::try_from(redirect.delay)?).await;
	redirect.fire(callback_page.navigator());

	let root_navigator = Arc::new(RecordingNavigator::default());
	let root_page = ReqwestConnector::new(config, store, root_navigator.clone())?;

	println!("Landing: {:?}.", root_page.handle_landing(&redirect.target)?);
	println!("Load: {:?}.", root_page.sync().await?);

	let view = root_page.view();

	for option in &view.picker.options {
		println!("- {}{}", option.label, if option.selected { " (selected)" } else { "" });
	}
	if let Some(calendar) = view.selected {
		for event in &calendar.events {
			println!("{} {} -> {}", event.title, event.start, event.end);
		}
	}

	println!("Session stored at {}.", store_path.display());

	Ok(())
}
