use crate::ResolvedContact;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const FALLBACK_NAME: &str = "Unknown_Contact";

/// Maximum length of a sanitized name, in characters
pub const MAX_NAME_LEN: usize = 50;

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turns a display string into a safe file base name. Falls back to
/// [`FALLBACK_NAME`] when nothing usable is left.
///
/// ## Example
///
/// ```
/// use csv_vcard::sanitize;
///
/// assert_eq!(sanitize("John? Smith/Jr"), "John__Smith_Jr");
/// assert_eq!(sanitize("  "), "Unknown_Contact");
/// ```
pub fn sanitize(candidate: &str) -> String {
	if candidate.trim().is_empty() {
		return FALLBACK_NAME.to_string();
	}

	let mut name = String::with_capacity(candidate.len());
	let mut in_whitespace = false;
	for c in candidate.chars() {
		if c.is_whitespace() {
			if !in_whitespace {
				name.push('_');
			}
			in_whitespace = true;
			continue;
		}
		in_whitespace = false;
		match RESERVED_CHARS.contains(&c) {
			true => name.push('_'),
			false => name.push(c),
		}
	}

	// Names made only of dots and underscores would leave a bare `.vcf`, so
	// they get the fallback as well.
	let name: String = name
		.trim_matches(|c: char| c == '.' || c == '_')
		.chars()
		.take(MAX_NAME_LEN)
		.collect();
	match name.is_empty() {
		true => FALLBACK_NAME.to_string(),
		false => name,
	}
}

/// Picks the string a per-contact file is named after: display name, else
/// given and family name, else Skype handle, else `Contact_<position>`.
pub fn candidate_name(contact: &ResolvedContact, position: usize) -> String {
	contact
		.display_name
		.clone()
		.or_else(|| contact.joined_name())
		.or_else(|| contact.skype_handle.clone())
		.unwrap_or_else(|| format!("Contact_{}", position))
}

/// Output paths already handed out in per-contact mode
#[derive(Debug, Default)]
pub struct OutputNames {
	used: HashSet<PathBuf>,
}

impl OutputNames {
	pub fn new() -> Self {
		Self::default()
	}

	/// Claims `<base>.vcf` in `dir`, or `<base>_<n>.vcf` with the smallest `n`
	/// that is neither claimed nor already on disk.
	pub fn claim(&mut self, dir: &Path, base: &str) -> PathBuf {
		let mut path = dir.join(format!("{}.vcf", base));
		let mut n = 1;
		while self.is_taken(&path) {
			path = dir.join(format!("{}_{}.vcf", base, n));
			n += 1;
		}
		self.used.insert(path.clone());
		path
	}

	fn is_taken(&self, path: &Path) -> bool {
		self.used.contains(path) || path.exists()
	}
}

#[test]
fn replaces_reserved_characters() {
	assert_eq!(sanitize("John? Smith/Jr"), "John__Smith_Jr");
	assert_eq!(sanitize("a<b>c:d\"e|f*g\\h"), "a_b_c_d_e_f_g_h");
}

#[test]
fn collapses_whitespace() {
	assert_eq!(sanitize("Jane \t  Doe"), "Jane_Doe");
	assert_eq!(sanitize("  Jane Doe  "), "Jane_Doe");
}

#[test]
fn trims_dots_and_underscores() {
	assert_eq!(sanitize("..hidden_"), "hidden");
	assert_eq!(sanitize("?Ann."), "Ann");
	assert_eq!(sanitize("..."), FALLBACK_NAME);
}

#[test]
fn blank_falls_back() {
	assert_eq!(sanitize(""), FALLBACK_NAME);
	assert_eq!(sanitize(" \t "), FALLBACK_NAME);
}

#[test]
fn truncates_to_fifty_characters() {
	let name = "abcdefghij".repeat(6);
	assert_eq!(name.len(), 60);
	assert_eq!(sanitize(&name).chars().count(), MAX_NAME_LEN);
	let name = "é".repeat(60);
	assert_eq!(sanitize(&name), "é".repeat(50));
}

#[test]
fn candidate_name_precedence() {
	let mut contact = ResolvedContact {
		display_name: Some("Ann".to_string()),
		given_name: Some("A".to_string()),
		family_name: Some("B".to_string()),
		skype_handle: Some("live:ann".to_string()),
		..Default::default()
	};
	assert_eq!(candidate_name(&contact, 3), "Ann");
	contact.display_name = None;
	assert_eq!(candidate_name(&contact, 3), "A B");
	contact.given_name = None;
	contact.family_name = None;
	assert_eq!(candidate_name(&contact, 3), "live:ann");
	contact.skype_handle = None;
	assert_eq!(candidate_name(&contact, 3), "Contact_3");
}

#[test]
fn claims_increment_on_collision() {
	let dir = tempfile::tempdir().unwrap();
	let mut names = OutputNames::new();
	assert_eq!(names.claim(dir.path(), "Ann"), dir.path().join("Ann.vcf"));
	assert_eq!(names.claim(dir.path(), "Ann"), dir.path().join("Ann_1.vcf"));
	assert_eq!(names.claim(dir.path(), "Ann"), dir.path().join("Ann_2.vcf"));
	assert_eq!(names.claim(dir.path(), "Bob"), dir.path().join("Bob.vcf"));
}

#[test]
fn claims_skip_existing_files() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(dir.path().join("Ann.vcf"), "").unwrap();
	let mut names = OutputNames::new();
	assert_eq!(names.claim(dir.path(), "Ann"), dir.path().join("Ann_1.vcf"));
}
