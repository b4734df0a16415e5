use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhoneKind {
	Cell,
	Home,
	Work,
	#[default]
	Voice,
}
impl PhoneKind {
	/// The vCard `TYPE=` parameter value
	pub fn as_type_param(&self) -> &'static str {
		match self {
			PhoneKind::Cell => "CELL",
			PhoneKind::Home => "HOME",
			PhoneKind::Work => "WORK",
			PhoneKind::Voice => "VOICE",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmailKind {
	#[default]
	Internet,
	Home,
	Work,
}
impl EmailKind {
	/// The vCard `TYPE=` parameter value
	pub fn as_type_param(&self) -> &'static str {
		match self {
			EmailKind::Internet => "INTERNET",
			EmailKind::Home => "HOME",
			EmailKind::Work => "WORK",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
	pub number: String,
	pub kind: PhoneKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
	pub address: String,
	pub kind: EmailKind,
}

/// A contact extracted from one CSV row, ready to be rendered.
///
/// Every field holds trimmed, non-blank values only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedContact {
	pub display_name: Option<String>,
	pub given_name: Option<String>,
	pub family_name: Option<String>,
	/// One entry per distinct number, in order of first occurrence
	pub phones: Vec<Phone>,
	pub emails: Vec<Email>,
	pub skype_handle: Option<String>,
	pub website: Option<String>,
	/// Unescaped note text
	pub note: Option<String>,
	pub avatar_url: Option<String>,
	/// Upper-cased
	pub country: Option<String>,
	pub created_at: Option<DateTime<Utc>>,
}

impl ResolvedContact {
	pub fn has_name_parts(&self) -> bool {
		self.given_name.is_some() || self.family_name.is_some()
	}

	/// Given and family name joined by a space, if either is present
	pub fn joined_name(&self) -> Option<String> {
		let given = self.given_name.as_deref().unwrap_or("");
		let family = self.family_name.as_deref().unwrap_or("");
		let joined = format!("{} {}", given, family);
		let joined = joined.trim();
		match joined.is_empty() {
			true => None,
			false => Some(joined.to_string()),
		}
	}
}

#[test]
fn joined_name_skips_missing_parts() {
	let contact = ResolvedContact {
		family_name: Some("Doe".to_string()),
		..Default::default()
	};
	assert_eq!(contact.joined_name().as_deref(), Some("Doe"));
	assert!(contact.has_name_parts());
	assert_eq!(ResolvedContact::default().joined_name(), None);
}
