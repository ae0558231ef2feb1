//! Render-ready view models for the root page.
//!
//! These are plain data; hosts map them onto whatever widget toolkit they use.

// self
use crate::{
	_prelude::*,
	auth::ExternalUserId,
	calendar::{Calendar, CalendarCollection, CalendarId},
	config::{API_KEY_ENV, ConnectorConfig},
};

/// Placeholder and empty-state text while calendars are loading.
pub const LOADING_CALENDARS: &str = "Loading calendars...";
/// Picker placeholder when there is nothing to choose from.
pub const NO_CALENDARS: &str = "No calendars";
/// Empty-state text when nothing is loading and no valid calendar is selected.
pub const EMPTY_STATE_IDLE: &str =
	"Connect your Google Calendar and choose a calendar to render it.";

/// One entry of the calendar picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerOption {
	/// Calendar id submitted on selection.
	pub id: CalendarId,
	/// `"<name> (<timezone>)"`.
	pub label: String,
	/// Whether this entry matches the stored selection.
	pub selected: bool,
}

/// Calendar picker state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarPicker {
	/// Options in collection order.
	pub options: Vec<PickerOption>,
	/// Disabled while loading or when there are no calendars.
	pub disabled: bool,
	/// Text shown when no option is selected.
	pub placeholder: &'static str,
}
impl CalendarPicker {
	/// Builds the picker for `collection`, marking the option equal to `selected`.
	pub fn new(
		collection: &CalendarCollection,
		selected: Option<&CalendarId>,
		is_loading: bool,
	) -> Self {
		let options = collection
			.iter()
			.map(|calendar| PickerOption {
				id: calendar.id.clone(),
				label: calendar.label(),
				selected: selected == Some(&calendar.id),
			})
			.collect::<Vec<_>>();
		let disabled = is_loading || options.is_empty();
		let placeholder = if is_loading { LOADING_CALENDARS } else { NO_CALENDARS };

		Self { options, disabled, placeholder }
	}

	/// The selected option, if the stored selection is present in the collection.
	pub fn selected(&self) -> Option<&PickerOption> {
		self.options.iter().find(|option| option.selected)
	}
}

/// Warning shown when the remote API key is not configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKeyWarning {
	/// Environment variable the operator must set.
	pub env_var: &'static str,
}
impl ApiKeyWarning {
	/// Returns the warning when `config` carries no API key.
	pub fn for_config(config: &ConnectorConfig) -> Option<Self> {
		config.api_key_missing().then_some(Self { env_var: API_KEY_ENV })
	}

	/// Warning heading.
	pub const fn heading(&self) -> &'static str {
		"Missing API Key"
	}
}
impl Display for ApiKeyWarning {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Calendar API key is missing. Set {} in your environment.", self.env_var)
	}
}

/// Everything the root page renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppView {
	/// Current identity.
	pub external_user_id: Option<ExternalUserId>,
	/// Disables the sign-in button while waiting for the authorization URL.
	pub is_signing_in: bool,
	/// Visible sign-in error.
	pub sign_in_error: Option<String>,
	/// Visible load error.
	pub load_error: Option<String>,
	/// Calendar picker.
	pub picker: CalendarPicker,
	/// Selected calendar resolved against the loaded collection.
	pub selected: Option<Calendar>,
	/// Text shown in place of the calendar when none is selected.
	pub empty_state: Option<&'static str>,
	/// Missing API key warning.
	pub api_key_warning: Option<ApiKeyWarning>,
}
impl AppView {
	/// Empty-state text for the given selection and loading status.
	pub fn empty_state_for(has_selection: bool, is_loading: bool) -> Option<&'static str> {
		match (has_selection, is_loading) {
			(true, _) => None,
			(false, true) => Some(LOADING_CALENDARS),
			(false, false) => Some(EMPTY_STATE_IDLE),
		}
	}

	/// Whether the sign-in button should be shown (no identity yet).
	pub fn shows_sign_in(&self) -> bool {
		self.external_user_id.is_none()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{calendar, test_config};

	#[test]
	fn picker_labels_and_marks_selection() {
		let mut work = calendar("work");

		work.name = "Work".into();
		work.timezone = "Europe/Berlin".into();

		let collection = CalendarCollection::new([work, calendar("home")]);
		let picker = CalendarPicker::new(&collection, Some(&"work".into()), false);

		assert!(!picker.disabled);
		assert_eq!(picker.options[0].label, "Work (Europe/Berlin)");
		assert_eq!(picker.selected().map(|o| o.id.as_str()), Some("work"));
		assert_eq!(picker.options.iter().filter(|o| o.selected).count(), 1);
	}

	#[test]
	fn picker_disabled_while_loading_or_empty() {
		let empty = CalendarCollection::default();
		let loading = CalendarPicker::new(&empty, None, true);
		let idle = CalendarPicker::new(&empty, None, false);

		assert!(loading.disabled);
		assert_eq!(loading.placeholder, LOADING_CALENDARS);
		assert!(idle.disabled);
		assert_eq!(idle.placeholder, NO_CALENDARS);

		let collection = CalendarCollection::new([calendar("a")]);
		let stale = CalendarPicker::new(&collection, Some(&"gone".into()), true);

		assert!(stale.disabled);
		assert_eq!(stale.selected(), None);
	}

	#[test]
	fn empty_state_follows_selection_and_loading() {
		assert_eq!(AppView::empty_state_for(true, true), None);
		assert_eq!(AppView::empty_state_for(false, true), Some(LOADING_CALENDARS));
		assert_eq!(AppView::empty_state_for(false, false), Some(EMPTY_STATE_IDLE));
	}

	#[test]
	fn api_key_warning_only_without_key() {
		assert_eq!(ApiKeyWarning::for_config(&test_config()), None);

		let mut config = test_config();

		config.api_key = Default::default();

		let warning = ApiKeyWarning::for_config(&config).expect("Missing key should warn.");

		assert_eq!(warning.heading(), "Missing API Key");
		assert_eq!(
			warning.to_string(),
			"Calendar API key is missing. Set BUILDCALENDAR_API_KEY in your environment."
		);
	}
}
