use crate::catalog::{self, MAX_PHONE_INDEX};
use crate::{parse_timestamp, ContactRecord, Email, Phone, PhoneKind, ResolvedContact};
use linked_hash_map::{Entry, LinkedHashMap};

/// Extracts a contact from a record.
///
/// Never fails: anything missing, blank or unparseable is left out.
pub fn resolve(record: &ContactRecord) -> ResolvedContact {
	let given_name = owned(record.value(catalog::GIVEN_NAME));
	let family_name = owned(record.value(catalog::FAMILY_NAME));
	let mut contact = ResolvedContact {
		display_name: None,
		given_name,
		family_name,
		phones: resolve_phones(record),
		emails: resolve_emails(record),
		skype_handle: owned(record.value(catalog::SKYPE_HANDLE)),
		website: owned(record.value(catalog::WEBSITE)),
		note: owned(record.value(catalog::NOTE)),
		avatar_url: owned(record.value(catalog::AVATAR_URL)),
		country: record.value(catalog::COUNTRY).map(str::to_uppercase),
		created_at: record.value(catalog::CREATED_AT).and_then(parse_timestamp),
	};
	contact.display_name = match record.value(catalog::DISPLAY_NAME) {
		Some(name) => Some(name.to_string()),
		None => contact.joined_name(),
	};
	tracing::trace!(?contact, "Resolved contact");
	contact
}

fn owned(value: Option<&str>) -> Option<String> {
	value.map(str::to_string)
}

/// Indexed columns first (plain, then profile), then the flat columns.
/// The first occurrence of each number wins and keeps its position.
fn resolve_phones(record: &ContactRecord) -> Vec<Phone> {
	let mut phones: LinkedHashMap<String, PhoneKind> = LinkedHashMap::new();
	for (number, kind) in phone_candidates(record) {
		match phones.entry(number) {
			Entry::Occupied(entry) => {
				tracing::debug!(kind = ?kind, kept = ?entry.get(), "Dropping duplicate phone number");
			}
			Entry::Vacant(entry) => {
				entry.insert(kind);
			}
		}
	}
	phones
		.into_iter()
		.map(|(number, kind)| Phone { number, kind })
		.collect()
}

fn phone_candidates(record: &ContactRecord) -> Vec<(String, PhoneKind)> {
	let mut candidates = Vec::new();
	for prefix in catalog::INDEXED_PHONE_PREFIXES {
		for index in 0..MAX_PHONE_INDEX {
			let number_col = catalog::indexed_phone_number(prefix, index);
			let number = match record.value(&number_col) {
				Some(number) => number,
				None => continue,
			};
			let kind = record
				.value(&catalog::indexed_phone_type(prefix, index))
				.map(catalog::phone_kind_from_label)
				.unwrap_or_default();
			candidates.push((number.to_string(), kind));
		}
	}
	for field in catalog::PHONE_FIELDS {
		if let Some(number) = record.value(field) {
			candidates.push((number.to_string(), catalog::phone_kind(field)));
		}
	}
	candidates
}

/// Every matching column contributes, duplicates included
fn resolve_emails(record: &ContactRecord) -> Vec<Email> {
	catalog::EMAIL_FIELDS
		.iter()
		.filter_map(|field| {
			record.value(field).map(|address| Email {
				address: address.to_string(),
				kind: catalog::email_kind(field),
			})
		})
		.collect()
}

#[cfg(test)]
fn record(fields: &[(&str, &str)]) -> ContactRecord {
	fields.iter().copied().collect()
}

#[cfg(test)]
use crate::EmailKind;

#[test]
fn display_name_wins_for_fn_but_parts_remain() {
	let contact = resolve(&record(&[
		("display_name", " Jane Doe "),
		("profile.name.first", "J"),
		("profile.name.surname", "D"),
	]));
	assert_eq!(contact.display_name.as_deref(), Some("Jane Doe"));
	assert_eq!(contact.given_name.as_deref(), Some("J"));
	assert_eq!(contact.family_name.as_deref(), Some("D"));
}

#[test]
fn name_built_from_parts() {
	let contact = resolve(&record(&[
		("display_name", "  "),
		("profile.name.first", "Jane"),
		("profile.name.surname", "Doe"),
	]));
	assert_eq!(contact.display_name.as_deref(), Some("Jane Doe"));

	let contact = resolve(&record(&[("profile.name.first", "Jane"), ("profile.name.surname", " ")]));
	assert_eq!(contact.display_name.as_deref(), Some("Jane"));
	assert_eq!(contact.family_name, None);
}

#[test]
fn no_name_at_all() {
	let contact = resolve(&record(&[("profile.name.first", ""), ("phone", "1")]));
	assert_eq!(contact.display_name, None);
	assert!(!contact.has_name_parts());
}

#[test]
fn blank_fields_are_absent() {
	let contact = resolve(&record(&[
		("profile.skype", " "),
		("profile.website", ""),
		("profile.about", "\t"),
		("profile.avatar_url", "  "),
		("profile.country", " "),
		("creation_time", " "),
		("email", "  "),
		("phones[0].number", " "),
	]));
	assert_eq!(contact, ResolvedContact::default());
}

#[test]
fn single_columns_are_trimmed() {
	let contact = resolve(&record(&[
		("profile.skype", " live:ann "),
		("profile.website", "https://ann.example "),
		("profile.about", " hi there "),
		("profile.avatar_url", " https://ann.example/a.png"),
		("profile.country", " no "),
		("creation_time", "2023-01-15 10:30:00Z"),
	]));
	assert_eq!(contact.skype_handle.as_deref(), Some("live:ann"));
	assert_eq!(contact.website.as_deref(), Some("https://ann.example"));
	assert_eq!(contact.note.as_deref(), Some("hi there"));
	assert_eq!(contact.avatar_url.as_deref(), Some("https://ann.example/a.png"));
	assert_eq!(contact.country.as_deref(), Some("NO"));
	assert!(contact.created_at.is_some());
}

#[test]
fn phones_in_scan_order() {
	let contact = resolve(&record(&[
		("work_phone", "3"),
		("profile.phones[0].number", "2"),
		("profile.phones[0].type", "Cell"),
		("phones[1].number", "1"),
		("phones[1].type", "home"),
		("phones[0].number", "0"),
	]));
	let phones: Vec<_> = contact
		.phones
		.iter()
		.map(|phone| (phone.number.as_str(), phone.kind))
		.collect();
	assert_eq!(
		phones,
		vec![
			("0", PhoneKind::Voice),
			("1", PhoneKind::Home),
			("2", PhoneKind::Cell),
			("3", PhoneKind::Work),
		]
	);
}

#[test]
fn duplicate_numbers_keep_first_occurrence() {
	let contact = resolve(&record(&[
		("phones[0].number", " 5551234 "),
		("phones[0].type", "home"),
		("profile.phones[3].number", "5551234"),
		("work_phone", "5551234"),
		("mobile", "555 1234"),
	]));
	assert_eq!(
		contact.phones,
		vec![
			Phone {
				number: "5551234".to_string(),
				kind: PhoneKind::Home,
			},
			Phone {
				number: "555 1234".to_string(),
				kind: PhoneKind::Cell,
			},
		]
	);
}

#[test]
fn indexed_phones_stop_at_nine() {
	let contact = resolve(&record(&[
		("phones[9].number", "9"),
		("phones[10].number", "10"),
	]));
	assert_eq!(contact.phones.len(), 1);
	assert_eq!(contact.phones[0].number, "9");
}

#[test]
fn emails_keep_duplicates() {
	let contact = resolve(&record(&[
		("email", "a@example.com"),
		("work_email", "a@example.com"),
		("contact.home_email", " b@example.com "),
	]));
	assert_eq!(
		contact.emails,
		vec![
			Email {
				address: "a@example.com".to_string(),
				kind: EmailKind::Internet,
			},
			Email {
				address: "a@example.com".to_string(),
				kind: EmailKind::Work,
			},
			Email {
				address: "b@example.com".to_string(),
				kind: EmailKind::Home,
			},
		]
	);
}

#[test]
fn unparseable_timestamp_is_absent() {
	let contact = resolve(&record(&[("creation_time", "not-a-date")]));
	assert_eq!(contact.created_at, None);
}
