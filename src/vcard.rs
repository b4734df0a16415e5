//! vCard 3.0 rendering.

use crate::ResolvedContact;
use std::fmt;

pub const LINE_SEPARATOR: &str = "\r\n";

/// A rendered vCard, one property per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCard {
	lines: Vec<String>,
}

impl VCard {
	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// Whether any line is exactly `line`
	pub fn contains_line(&self, line: &str) -> bool {
		self.lines.iter().any(|l| l == line)
	}
}

/// Lines joined with CRLF, without a trailing line break
impl fmt::Display for VCard {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.lines.join(LINE_SEPARATOR))
	}
}

/// Renders a contact. Properties are emitted in a fixed order and absent
/// fields produce no line at all.
pub fn render(contact: &ResolvedContact) -> VCard {
	let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

	if let Some(name) = &contact.display_name {
		lines.push(format!("FN:{}", name));
	}
	if contact.has_name_parts() {
		lines.push(format!(
			"N:{};{};;;",
			contact.family_name.as_deref().unwrap_or(""),
			contact.given_name.as_deref().unwrap_or(""),
		));
	}
	if let Some(handle) = &contact.skype_handle {
		lines.push(format!("X-SKYPE:{}", handle));
		lines.push(format!("IMPP:skype:{}", handle));
	}
	if let Some(website) = &contact.website {
		lines.push(format!("URL:{}", website));
	}
	if let Some(note) = &contact.note {
		lines.push(format!("NOTE:{}", escape_text(note)));
	}
	if let Some(avatar_url) = &contact.avatar_url {
		lines.push(format!("PHOTO;VALUE=URI:{}", avatar_url));
	}
	for phone in &contact.phones {
		lines.push(format!("TEL;TYPE={}:{}", phone.kind.as_type_param(), phone.number));
	}
	for email in &contact.emails {
		lines.push(format!("EMAIL;TYPE={}:{}", email.kind.as_type_param(), email.address));
	}
	if let Some(country) = &contact.country {
		lines.push(format!("ADR:;;;;;;{}", country));
	}
	if let Some(created_at) = &contact.created_at {
		lines.push(format!("REV:{}", created_at.format("%Y%m%dT%H%M%SZ")));
	}

	lines.push("END:VCARD".to_string());
	VCard { lines }
}

/// Escapes a text value.
///
/// Backslash, comma and semicolon get a backslash, carriage returns are
/// dropped and newlines become a literal `\n`.
pub fn escape_text(s: &str) -> String {
	let mut result = String::with_capacity(s.len());

	for c in s.chars() {
		match c {
			'\\' => result.push_str("\\\\"),
			',' => result.push_str("\\,"),
			';' => result.push_str("\\;"),
			'\r' => {}
			'\n' => result.push_str("\\n"),
			_ => result.push(c),
		}
	}

	result
}

#[cfg(test)]
use crate::{Email, EmailKind, Phone, PhoneKind};

#[test]
fn escape_note() {
	assert_eq!(escape_text("About me; I like C,D\\E"), "About me\\; I like C\\,D\\\\E");
	assert_eq!(escape_text("line one\r\nline two"), "line one\\nline two");
	assert_eq!(escape_text("\\n"), "\\\\n");
}

#[test]
fn empty_contact() {
	let card = render(&ResolvedContact::default());
	assert_eq!(card.to_string(), "BEGIN:VCARD\r\nVERSION:3.0\r\nEND:VCARD");
}

#[test]
fn full_contact_in_order() {
	let contact = ResolvedContact {
		display_name: Some("Jane Doe".to_string()),
		given_name: Some("J".to_string()),
		family_name: Some("D".to_string()),
		phones: vec![
			Phone {
				number: "5551234".to_string(),
				kind: PhoneKind::Work,
			},
			Phone {
				number: "5550000".to_string(),
				kind: PhoneKind::Voice,
			},
		],
		emails: vec![Email {
			address: "jane@example.com".to_string(),
			kind: EmailKind::Home,
		}],
		skype_handle: Some("live:jane".to_string()),
		website: Some("https://jane.example".to_string()),
		note: Some("About me; I like C,D\\E".to_string()),
		avatar_url: Some("https://jane.example/a.png".to_string()),
		country: Some("NO".to_string()),
		created_at: crate::parse_timestamp("2023-01-15 10:30:00Z"),
	};
	assert_eq!(
		render(&contact).lines(),
		&[
			"BEGIN:VCARD",
			"VERSION:3.0",
			"FN:Jane Doe",
			"N:D;J;;;",
			"X-SKYPE:live:jane",
			"IMPP:skype:live:jane",
			"URL:https://jane.example",
			"NOTE:About me\\; I like C\\,D\\\\E",
			"PHOTO;VALUE=URI:https://jane.example/a.png",
			"TEL;TYPE=WORK:5551234",
			"TEL;TYPE=VOICE:5550000",
			"EMAIL;TYPE=HOME:jane@example.com",
			"ADR:;;;;;;NO",
			"REV:20230115T103000Z",
			"END:VCARD",
		]
	);
}

#[test]
fn name_lines_are_independent() {
	let only_display = ResolvedContact {
		display_name: Some("Ann".to_string()),
		..Default::default()
	};
	let card = render(&only_display);
	assert!(card.contains_line("FN:Ann"));
	assert!(!card.lines().iter().any(|line| line.starts_with("N:")));

	let only_family = ResolvedContact {
		family_name: Some("Doe".to_string()),
		..Default::default()
	};
	let card = render(&only_family);
	assert!(card.contains_line("N:Doe;;;;"));
	assert!(!card.lines().iter().any(|line| line.starts_with("FN:")));
}
