mod catalog;
mod contact;
mod headers;
pub mod logging;
mod pipeline;
mod record;
mod resolve;
mod sanitize;
mod target;
mod timestamp;
mod vcard;

use std::io;
use std::path::PathBuf;

pub use contact::{Email, EmailKind, Phone, PhoneKind, ResolvedContact};
pub use headers::Headers;
pub use pipeline::{Pipeline, RowFailure, Summary};
pub use record::ContactRecord;
pub use resolve::resolve;
pub use sanitize::{candidate_name, sanitize, OutputNames, FALLBACK_NAME, MAX_NAME_LEN};
pub use target::{DirectoryTarget, FileTarget, StringTarget, Target};
pub use timestamp::parse_timestamp;
pub use vcard::{escape_text, render, VCard};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),
	#[error("Failed to write {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("No output target was set")]
	NoTarget,
}

impl Error {
	pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
		Error::Io {
			path: path.into(),
			source,
		}
	}
}

pub type Row = csv::StringRecord;
pub type RowResult = Result<Row, Error>;
