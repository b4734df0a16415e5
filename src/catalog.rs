//! Column names recognised in contact exports.
//!
//! The tables are consulted in the order they're written, so the order here is
//! the order phones and emails show up in the output.

use crate::{EmailKind, PhoneKind};

pub const DISPLAY_NAME: &str = "display_name";
pub const GIVEN_NAME: &str = "profile.name.first";
pub const FAMILY_NAME: &str = "profile.name.surname";
pub const SKYPE_HANDLE: &str = "profile.skype";
pub const WEBSITE: &str = "profile.website";
pub const NOTE: &str = "profile.about";
pub const AVATAR_URL: &str = "profile.avatar_url";
pub const COUNTRY: &str = "profile.country";
pub const CREATED_AT: &str = "creation_time";

/// Prefixes of `<prefix>[i].number` / `<prefix>[i].type` column pairs
pub const INDEXED_PHONE_PREFIXES: &[&str] = &["phones", "profile.phones"];

/// Indexed phone columns are scanned for `0..MAX_PHONE_INDEX`
pub const MAX_PHONE_INDEX: usize = 10;

pub const PHONE_FIELDS: &[&str] = &[
	"phone",
	"phone_number",
	"mobile",
	"mobile_phone",
	"cell",
	"cell_phone",
	"home_phone",
	"work_phone",
	"business_phone",
	"profile.phone",
	"profile.mobile",
	"profile.home_phone",
	"profile.work_phone",
	"contact.phone",
	"contact.mobile",
	"contact.home_phone",
	"contact.work_phone",
];

pub const EMAIL_FIELDS: &[&str] = &[
	"email",
	"mail",
	"email_address",
	"home_email",
	"work_email",
	"business_email",
	"profile.email",
	"profile.home_email",
	"profile.work_email",
	"contact.email",
	"contact.home_email",
	"contact.work_email",
];

/// First match wins, so cell has to come before the others
/// (`work_mobile` is a cell number).
pub const PHONE_KIND_HINTS: &[(&str, PhoneKind)] = &[
	("mobile", PhoneKind::Cell),
	("cell", PhoneKind::Cell),
	("home", PhoneKind::Home),
	("work", PhoneKind::Work),
	("business", PhoneKind::Work),
];

pub const EMAIL_KIND_HINTS: &[(&str, EmailKind)] = &[
	("home", EmailKind::Home),
	("work", EmailKind::Work),
	("business", EmailKind::Work),
];

pub fn indexed_phone_number(prefix: &str, index: usize) -> String {
	format!("{}[{}].number", prefix, index)
}

pub fn indexed_phone_type(prefix: &str, index: usize) -> String {
	format!("{}[{}].type", prefix, index)
}

/// Infers the phone kind from a column name
pub fn phone_kind(hint: &str) -> PhoneKind {
	infer(hint, PHONE_KIND_HINTS).unwrap_or_default()
}

/// Reads the value of a `.type` column. Only `cell`, `home` and `work` are
/// recognised, in any case; everything else is a voice number.
pub fn phone_kind_from_label(label: &str) -> PhoneKind {
	let label = label.trim();
	if label.eq_ignore_ascii_case("cell") {
		PhoneKind::Cell
	} else if label.eq_ignore_ascii_case("home") {
		PhoneKind::Home
	} else if label.eq_ignore_ascii_case("work") {
		PhoneKind::Work
	} else {
		PhoneKind::Voice
	}
}

/// Infers the email kind from a column name
pub fn email_kind(hint: &str) -> EmailKind {
	infer(hint, EMAIL_KIND_HINTS).unwrap_or_default()
}

fn infer<K: Copy>(hint: &str, table: &[(&str, K)]) -> Option<K> {
	let hint = hint.to_lowercase();
	table
		.iter()
		.find(|(pattern, _)| hint.contains(pattern))
		.map(|(_, kind)| *kind)
}

#[test]
fn phone_kind_from_column_name() {
	assert_eq!(phone_kind("work_phone"), PhoneKind::Work);
	assert_eq!(phone_kind("contact.mobile"), PhoneKind::Cell);
	assert_eq!(phone_kind("Home_Phone"), PhoneKind::Home);
	assert_eq!(phone_kind("business_phone"), PhoneKind::Work);
	assert_eq!(phone_kind("phone"), PhoneKind::Voice);
	assert_eq!(phone_kind("work_mobile"), PhoneKind::Cell);
}

#[test]
fn phone_kind_from_type_label() {
	assert_eq!(phone_kind_from_label("CELL"), PhoneKind::Cell);
	assert_eq!(phone_kind_from_label(" home "), PhoneKind::Home);
	assert_eq!(phone_kind_from_label("Work"), PhoneKind::Work);
	assert_eq!(phone_kind_from_label("mobile"), PhoneKind::Voice);
	assert_eq!(phone_kind_from_label("business"), PhoneKind::Voice);
	assert_eq!(phone_kind_from_label("homework"), PhoneKind::Voice);
	assert_eq!(phone_kind_from_label("other"), PhoneKind::Voice);
	assert_eq!(phone_kind_from_label(""), PhoneKind::Voice);
}

#[test]
fn email_kind_from_column_name() {
	assert_eq!(email_kind("profile.work_email"), EmailKind::Work);
	assert_eq!(email_kind("HOME_EMAIL"), EmailKind::Home);
	assert_eq!(email_kind("mail"), EmailKind::Internet);
}

#[test]
fn catalog_fields_are_unique() {
	for (i, field) in PHONE_FIELDS.iter().enumerate() {
		assert!(!PHONE_FIELDS[i + 1..].contains(field), "{}", field);
	}
	for (i, field) in EMAIL_FIELDS.iter().enumerate() {
		assert!(!EMAIL_FIELDS[i + 1..].contains(field), "{}", field);
	}
}
