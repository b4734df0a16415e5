use crate::{Headers, Row};
use linked_hash_map::{Entry, LinkedHashMap};

/// One CSV row keyed by column name, in header order.
///
/// Columns missing from the row are absent from the record, which is not the
/// same as being present with an empty value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactRecord {
	fields: LinkedHashMap<String, String>,
}

impl ContactRecord {
	/// Pairs each header with its field. Rows shorter than the header leave the
	/// trailing columns absent. A repeated column keeps its first position and
	/// its last value.
	pub fn from_row(headers: &Headers, row: &Row) -> Self {
		let mut fields = LinkedHashMap::new();
		for (name, value) in headers.into_iter().zip(row.iter()) {
			match fields.entry(name.to_string()) {
				Entry::Occupied(mut entry) => {
					entry.insert(value.to_string());
				}
				Entry::Vacant(entry) => {
					entry.insert(value.to_string());
				}
			}
		}
		Self { fields }
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// The raw field, which may be blank
	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str)
	}

	/// The trimmed field, or `None` if it's absent or only whitespace
	pub fn value(&self, name: &str) -> Option<&str> {
		self.get(name).map(str::trim).filter(|value| !value.is_empty())
	}

	pub fn columns(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContactRecord {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			fields: iter
				.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		}
	}
}

#[test]
fn short_row_leaves_columns_absent() {
	let headers = Headers::from_row(Row::from(vec!["display_name", "phone", "email"]));
	let record = ContactRecord::from_row(&headers, &Row::from(vec!["Ann", ""]));
	assert_eq!(record.len(), 2);
	assert_eq!(record.get("phone"), Some(""));
	assert!(!record.contains("email"));
	assert_eq!(record.columns().collect::<Vec<_>>(), vec!["display_name", "phone"]);
}

#[test]
fn repeated_column_keeps_last_value() {
	let headers = Headers::from_row(Row::from(vec!["email", "display_name", "email"]));
	let record = ContactRecord::from_row(&headers, &Row::from(vec!["a@x", "Ann", "b@x"]));
	assert_eq!(record.len(), 2);
	assert_eq!(record.get("email"), Some("b@x"));
	assert_eq!(record.columns().collect::<Vec<_>>(), vec!["email", "display_name"]);
}

#[test]
fn blank_values_are_absent() {
	let record: ContactRecord = vec![("a", "   "), ("b", "\t"), ("c", "  x ")]
		.into_iter()
		.collect();
	assert_eq!(record.get("a"), Some("   "));
	assert_eq!(record.value("a"), None);
	assert_eq!(record.value("b"), None);
	assert_eq!(record.value("c"), Some("x"));
	assert_eq!(record.value("missing"), None);
}
