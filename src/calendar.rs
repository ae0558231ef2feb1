//! Read-only calendar models cached from the remote calendar API.

// std
use std::{collections::HashSet, ops::Deref};
// self
use crate::_prelude::*;

/// Opaque calendar identifier assigned by the remote API.
///
/// Unlike [`ExternalUserId`](crate::auth::ExternalUserId) this is not validated; selection
/// accepts any value and resolves it against the loaded collection later.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);
impl CalendarId {
	/// Wraps a raw identifier.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the identifier as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Deref for CalendarId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl From<&str> for CalendarId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for CalendarId {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for CalendarId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Calendar({})", self.0)
	}
}
impl Display for CalendarId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Single event belonging to a [`Calendar`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
	/// Event identifier.
	pub id: String,
	/// Event title.
	pub title: String,
	/// Start instant.
	#[serde(with = "time::serde::rfc3339")]
	pub start: OffsetDateTime,
	/// End instant.
	#[serde(with = "time::serde::rfc3339")]
	pub end: OffsetDateTime,
	/// Optional free-text description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Optional location.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

/// Calendar with its events as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
	/// Calendar identifier.
	pub id: CalendarId,
	/// Display name.
	pub name: String,
	/// IANA timezone name reported by the provider.
	pub timezone: String,
	/// Events synchronized for the calendar.
	#[serde(default)]
	pub events: Vec<CalendarEvent>,
}
impl Calendar {
	/// Label used by calendar pickers, e.g. `Work (Europe/Berlin)`.
	pub fn label(&self) -> String {
		format!("{} ({})", self.name, self.timezone)
	}
}

/// Ordered calendar sequence, unique by id.
///
/// The order is the display order and the default-selection tie-break.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CalendarCollection(Vec<Calendar>);
impl CalendarCollection {
	/// Builds a collection, keeping the first occurrence of any duplicated id.
	pub fn new(calendars: impl IntoIterator<Item = Calendar>) -> Self {
		let mut seen = HashSet::new();

		Self(calendars.into_iter().filter(|c| seen.insert(c.id.clone())).collect())
	}

	/// Finds a calendar by id.
	pub fn find(&self, id: &CalendarId) -> Option<&Calendar> {
		self.0.iter().find(|c| &c.id == id)
	}

	/// Checks whether the collection holds `id`.
	pub fn contains(&self, id: &CalendarId) -> bool {
		self.find(id).is_some()
	}

	/// Returns the first calendar in display order.
	pub fn first(&self) -> Option<&Calendar> {
		self.0.first()
	}

	/// Iterates over the calendars in display order.
	pub fn iter(&self) -> std::slice::Iter<'_, Calendar> {
		self.0.iter()
	}

	/// Number of calendars.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no calendars are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl FromIterator<Calendar> for CalendarCollection {
	fn from_iter<I: IntoIterator<Item = Calendar>>(iter: I) -> Self {
		Self::new(iter)
	}
}
impl<'a> IntoIterator for &'a CalendarCollection {
	type IntoIter = std::slice::Iter<'a, Calendar>;
	type Item = &'a Calendar;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
