use crate::Row;
use csv::StringRecordIter;
use std::collections::HashSet;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// The headers of a CSV file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Headers {
	row: Row,
}

impl Headers {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.row.len()
	}

	pub fn is_empty(&self) -> bool {
		self.row.is_empty()
	}

	/// A byte order mark in front of the first column is dropped. Repeated
	/// column names are kept; the record keeps the last value for them.
	pub fn from_row(row: Row) -> Self {
		let mut seen = HashSet::new();
		let mut header = Headers::new();
		for (i, field) in row.iter().enumerate() {
			let field = match i {
				0 => field.trim_start_matches(BYTE_ORDER_MARK),
				_ => field,
			};
			if !seen.insert(field) {
				tracing::warn!(column = field, "Duplicated column, later values win");
			}
			header.row.push_field(field);
		}
		header
	}
}

impl<'a> IntoIterator for &'a Headers {
	type Item = &'a str;
	type IntoIter = StringRecordIter<'a>;

	fn into_iter(self) -> StringRecordIter<'a> {
		self.row.into_iter()
	}
}

#[test]
fn duplicated_column_is_kept() {
	let row = Row::from(vec!["email", "phone", "email"]);
	let headers = Headers::from_row(row);
	assert_eq!(headers.into_iter().collect::<Vec<_>>(), vec!["email", "phone", "email"]);
}

#[test]
fn strips_byte_order_mark() {
	let row = Row::from(vec!["\u{feff}display_name", "phone"]);
	let headers = Headers::from_row(row);
	assert_eq!(headers.into_iter().collect::<Vec<_>>(), vec!["display_name", "phone"]);
}
