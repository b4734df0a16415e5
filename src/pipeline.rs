use crate::headers::Headers;
use crate::target::{StringTarget, Target};
use crate::{render, resolve, ContactRecord, Error, ResolvedContact, RowResult};
use csv::{Reader, ReaderBuilder, StringRecordsIntoIter};
use std::io;
use std::path::Path;

/// Reads contact rows and writes a vCard for each of them.
pub struct Pipeline<'a> {
	pub headers: Headers,
	iterator: Box<dyn Iterator<Item = RowResult> + 'a>,
	target: Option<Box<dyn Target + 'a>>,
}

impl<'a> Pipeline<'a> {
	pub fn from_reader<R: io::Read + 'a>(mut reader: Reader<R>) -> Result<Self, Error> {
		let headers_row = reader.headers()?.clone();
		let row_iterator = RowIter::from_records(reader.into_records());
		Ok(Pipeline {
			headers: Headers::from_row(headers_row),
			iterator: Box::new(row_iterator),
			target: None,
		})
	}

	/// Create a pipeline from a CSV or TSV file. Rows may be shorter or longer
	/// than the header.
	pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<Self, Error> {
		let file_path = file_path.as_ref();
		let delimiter = match file_path.extension().and_then(|ext| ext.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
			_ => b',',
		};
		let reader = ReaderBuilder::new()
			.delimiter(delimiter)
			.flexible(true)
			.from_path(file_path)?;
		tracing::debug!(path = %file_path.display(), delimiter = ?(delimiter as char), "Opened input");
		Self::from_reader(reader)
	}

	/// Where the cards go.
	///
	/// ## Example
	///
	/// ```
	/// use csv_vcard::{Pipeline, StringTarget};
	///
	/// let mut vcf = String::new();
	/// let summary = Pipeline::from_path("test/Ann.csv")
	///   .unwrap()
	///   .flush(StringTarget::new(&mut vcf))
	///   .run()
	///   .unwrap();
	///
	/// assert_eq!(summary.converted, 1);
	/// assert_eq!(
	///   vcf,
	///   "BEGIN:VCARD\r\n\
	///     VERSION:3.0\r\n\
	///     FN:Ann\r\n\
	///     TEL;TYPE=HOME:5550000\r\n\
	///     END:VCARD\r\n"
	/// );
	/// ```
	pub fn flush(mut self, target: impl Target + 'a) -> Self {
		self.target = Some(Box::new(target));
		self
	}

	/// The records of each row, keyed by column name.
	pub fn records(self) -> impl Iterator<Item = Result<ContactRecord, Error>> + 'a {
		let headers = self.headers;
		self.iterator
			.map(move |row| row.map(|row| ContactRecord::from_row(&headers, &row)))
	}

	/// The resolved contact of each row, for callers that render themselves.
	///
	/// ## Example
	///
	/// ```
	/// use csv_vcard::Pipeline;
	///
	/// let names: Vec<_> = Pipeline::from_path("test/Contacts.csv")
	///   .unwrap()
	///   .contacts()
	///   .map(|contact| contact.unwrap().display_name)
	///   .collect();
	///
	/// assert_eq!(
	///   names,
	///   vec![
	///     Some("Jane Doe".to_string()),
	///     Some("Ole Nordmann".to_string()),
	///     None,
	///   ]
	/// );
	/// ```
	pub fn contacts(self) -> impl Iterator<Item = Result<ResolvedContact, Error>> + 'a {
		self.records().map(|record| record.map(|record| resolve(&record)))
	}

	/// Run through every row in order. A row that can't be read or written is
	/// recorded in the [`Summary`] and the rest still get converted. Only
	/// finishing the target can fail the whole run.
	pub fn run(self) -> Result<Summary, Error> {
		let mut target = match self.target {
			Some(target) => target,
			None => return Err(Error::NoTarget),
		};
		let headers = self.headers;
		let mut summary = Summary::default();
		tracing::info!(columns = headers.len(), "Converting contacts");

		for (i, row) in self.iterator.enumerate() {
			let position = i + 1;
			let _span = tracing::debug_span!("row", position).entered();
			let result = row.and_then(|row| {
				let contact = resolve(&ContactRecord::from_row(&headers, &row));
				let card = render(&contact);
				target.write_card(position, &contact, &card)
			});
			match result {
				Ok(()) => summary.converted += 1,
				Err(error) => {
					tracing::warn!(row = position, %error, "Skipping contact");
					summary.failures.push(RowFailure {
						row: position,
						error,
					});
				}
			}
		}

		target.finish()?;
		tracing::info!(
			converted = summary.converted,
			failed = summary.failures.len(),
			"Done"
		);
		Ok(summary)
	}

	/// Renders every row into one string, cards separated by a blank line.
	///
	/// ## Example
	///
	/// ```
	/// use csv_vcard::Pipeline;
	///
	/// let vcf = Pipeline::from_path("test/Contacts.csv")
	///   .unwrap()
	///   .collect_into_string()
	///   .unwrap();
	///
	/// assert_eq!(vcf.matches("BEGIN:VCARD").count(), 3);
	/// assert!(vcf.contains("END:VCARD\r\n\r\nBEGIN:VCARD"));
	/// ```
	pub fn collect_into_string(self) -> Result<String, Error> {
		let mut vcf = String::new();
		self.flush(StringTarget::new(&mut vcf)).run()?;
		Ok(vcf)
	}
}

/// What a [`Pipeline::run`] did
#[derive(Debug, Default)]
pub struct Summary {
	pub converted: usize,
	pub failures: Vec<RowFailure>,
}
impl Summary {
	pub fn has_failures(&self) -> bool {
		!self.failures.is_empty()
	}
}

/// A row that couldn't be converted
#[derive(Debug)]
pub struct RowFailure {
	/// 1-based position among the data rows
	pub row: usize,
	pub error: Error,
}

pub struct RowIter<R: io::Read> {
	inner: StringRecordsIntoIter<R>,
}
impl<R: io::Read> RowIter<R> {
	pub fn from_records(records: StringRecordsIntoIter<R>) -> Self {
		RowIter { inner: records }
	}
}
impl<R: io::Read> Iterator for RowIter<R> {
	type Item = RowResult;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|result| result.map_err(Error::from))
	}
}

#[cfg(test)]
fn from_str(csv: &str) -> Pipeline<'_> {
	let reader = ReaderBuilder::new().flexible(true).from_reader(csv.as_bytes());
	Pipeline::from_reader(reader).unwrap()
}

#[test]
fn rows_stay_in_order() {
	let vcf = from_str("display_name\nR1\nR2\nR3\n")
		.collect_into_string()
		.unwrap();
	let names: Vec<_> = vcf.lines().filter(|line| line.starts_with("FN:")).collect();
	assert_eq!(names, vec!["FN:R1", "FN:R2", "FN:R3"]);
}

#[test]
fn end_to_end_single_row() {
	let vcf = from_str("display_name,phones[0].number,phones[0].type\n\"Ann\",5550000,home\n")
		.collect_into_string()
		.unwrap();
	assert!(vcf.contains("FN:Ann\r\n"));
	assert!(vcf.contains("TEL;TYPE=HOME:5550000\r\n"));
	assert!(!vcf.contains("\r\nN:"));
	assert!(!vcf.contains("EMAIL"));
}

#[test]
fn duplicate_phones_render_once() {
	let vcf = from_str("phones[0].number,profile.phones[1].number,phone,mobile\n555, 555 ,555,556\n")
		.collect_into_string()
		.unwrap();
	assert_eq!(vcf.matches("TEL;").count(), 2);
	assert!(vcf.contains("TEL;TYPE=VOICE:555\r\n"));
	assert!(vcf.contains("TEL;TYPE=CELL:556\r\n"));
}

#[test]
fn duplicated_header_still_converts() {
	let vcf = from_str("display_name,email,email\nAnn,a@x,b@x\n")
		.collect_into_string()
		.unwrap();
	assert!(vcf.contains("FN:Ann\r\n"));
	assert!(vcf.contains("EMAIL;TYPE=INTERNET:b@x\r\n"));
	assert!(!vcf.contains("a@x"));
}

#[test]
fn type_labels_only_match_exactly() {
	let vcf = from_str("phones[0].number,phones[0].type,phones[1].number,phones[1].type,phones[2].number,phones[2].type\n1,mobile,2,business,3, Cell \n")
		.collect_into_string()
		.unwrap();
	assert!(vcf.contains("TEL;TYPE=VOICE:1\r\n"));
	assert!(vcf.contains("TEL;TYPE=VOICE:2\r\n"));
	assert!(vcf.contains("TEL;TYPE=CELL:3\r\n"));
}

#[test]
fn run_without_target() {
	match from_str("display_name\nA\n").run() {
		Err(Error::NoTarget) => {}
		_ => panic!("Expected NoTarget"),
	}
}

#[cfg(test)]
struct FailingTarget {
	positions: Vec<usize>,
}
#[cfg(test)]
impl Target for FailingTarget {
	fn write_card(&mut self, position: usize, _: &ResolvedContact, _: &crate::VCard) -> Result<(), Error> {
		self.positions.push(position);
		match position {
			2 => Err(Error::io("two.vcf", io::Error::new(io::ErrorKind::Other, "disk full"))),
			_ => Ok(()),
		}
	}
}

#[test]
fn failed_contact_does_not_stop_batch() {
	let mut target = FailingTarget { positions: vec![] };
	let summary = from_str("display_name\nA\nB\nC\n")
		.flush(&mut target)
		.run()
		.unwrap();
	assert_eq!(summary.converted, 2);
	assert_eq!(summary.failures.len(), 1);
	assert_eq!(summary.failures[0].row, 2);
	assert_eq!(target.positions, vec![1, 2, 3]);
}

#[test]
fn malformed_row_is_reported() {
	let reader = ReaderBuilder::new().from_reader("display_name,phone\nA,1\nB,2,3\nC,4\n".as_bytes());
	let summary = Pipeline::from_reader(reader)
		.unwrap()
		.flush(crate::target::StringTarget::new(&mut String::new()))
		.run()
		.unwrap();
	assert_eq!(summary.converted, 2);
	assert_eq!(summary.failures[0].row, 2);
	assert!(matches!(summary.failures[0].error, Error::Csv(_)));
}

#[test]
fn per_contact_files() {
	let dir = tempfile::tempdir().unwrap();
	let out = dir.path().join("out");
	let summary = Pipeline::from_path("test/Contacts.csv")
		.unwrap()
		.flush(crate::DirectoryTarget::new(&out))
		.run()
		.unwrap();
	assert_eq!(summary.converted, 3);
	assert!(out.join("Jane_Doe.vcf").exists());
	assert!(out.join("Ole_Nordmann.vcf").exists());
	assert!(out.join("live_someone.vcf").exists());
}
