use crate::sanitize::{candidate_name, sanitize, OutputNames};
use crate::vcard::LINE_SEPARATOR;
use crate::{Error, ResolvedContact, VCard};
use std::fs;
use std::path::PathBuf;

/// Blank line between cards in a multi-card file
const CARD_SEPARATOR: &str = "\r\n\r\n";

pub trait Target {
	/// Called once per row, in row order. `position` is 1-based.
	fn write_card(
		&mut self,
		position: usize,
		contact: &ResolvedContact,
		card: &VCard,
	) -> Result<(), Error>;

	/// Called after the last row
	fn finish(&mut self) -> Result<(), Error> {
		Ok(())
	}
}

/// Collects cards for a single file, separated by a blank line
#[derive(Debug, Default)]
struct Cards {
	text: String,
	count: usize,
}
impl Cards {
	fn push(&mut self, card: &VCard) {
		if self.count > 0 {
			self.text.push_str(CARD_SEPARATOR);
		}
		self.text.push_str(&card.to_string());
		self.count += 1;
	}
	fn into_text(self) -> String {
		let mut text = self.text;
		if self.count > 0 {
			text.push_str(LINE_SEPARATOR);
		}
		text
	}
}

/// Writes every card into one file once the input is done
pub struct FileTarget {
	path: PathBuf,
	cards: Cards,
}
impl FileTarget {
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self {
			path: path.into(),
			cards: Cards::default(),
		}
	}
}
impl Target for FileTarget {
	fn write_card(&mut self, _: usize, _: &ResolvedContact, card: &VCard) -> Result<(), Error> {
		self.cards.push(card);
		Ok(())
	}
	fn finish(&mut self) -> Result<(), Error> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
		}
		let cards = std::mem::take(&mut self.cards);
		let count = cards.count;
		fs::write(&self.path, cards.into_text()).map_err(|e| Error::io(&self.path, e))?;
		tracing::info!(path = %self.path.display(), count, "Wrote contacts");
		Ok(())
	}
}

/// Writes one file per contact, named after the contact
pub struct DirectoryTarget {
	dir: PathBuf,
	names: OutputNames,
	created: bool,
	written: Vec<PathBuf>,
}
impl DirectoryTarget {
	pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
		Self {
			dir: dir.into(),
			names: OutputNames::new(),
			created: false,
			written: Vec::new(),
		}
	}

	/// Files written so far, in row order
	pub fn written(&self) -> &[PathBuf] {
		&self.written
	}
}
impl Target for DirectoryTarget {
	fn write_card(
		&mut self,
		position: usize,
		contact: &ResolvedContact,
		card: &VCard,
	) -> Result<(), Error> {
		if !self.created {
			fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
			self.created = true;
		}
		let base = sanitize(&candidate_name(contact, position));
		let path = self.names.claim(&self.dir, &base);
		let text = card.to_string() + LINE_SEPARATOR;
		fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
		tracing::debug!(path = %path.display(), "Wrote contact");
		self.written.push(path);
		Ok(())
	}
	fn finish(&mut self) -> Result<(), Error> {
		tracing::info!(dir = %self.dir.display(), count = self.written.len(), "Wrote contacts");
		Ok(())
	}
}

/// Single-file output into a string
pub struct StringTarget<'a> {
	s: &'a mut String,
	cards: Cards,
}
impl<'a> StringTarget<'a> {
	pub fn new(s: &'a mut String) -> Self {
		Self {
			s,
			cards: Cards::default(),
		}
	}
}
impl<'a> Target for StringTarget<'a> {
	fn write_card(&mut self, _: usize, _: &ResolvedContact, card: &VCard) -> Result<(), Error> {
		self.cards.push(card);
		Ok(())
	}
	fn finish(&mut self) -> Result<(), Error> {
		self.s.push_str(&std::mem::take(&mut self.cards).into_text());
		Ok(())
	}
}

impl<T: Target + ?Sized> Target for Box<T> {
	fn write_card(
		&mut self,
		position: usize,
		contact: &ResolvedContact,
		card: &VCard,
	) -> Result<(), Error> {
		(**self).write_card(position, contact, card)
	}
	fn finish(&mut self) -> Result<(), Error> {
		(**self).finish()
	}
}

impl<T: Target + ?Sized> Target for &mut T {
	fn write_card(
		&mut self,
		position: usize,
		contact: &ResolvedContact,
		card: &VCard,
	) -> Result<(), Error> {
		(**self).write_card(position, contact, card)
	}
	fn finish(&mut self) -> Result<(), Error> {
		(**self).finish()
	}
}

#[cfg(test)]
fn card_named(name: &str) -> (ResolvedContact, VCard) {
	let contact = ResolvedContact {
		display_name: Some(name.to_string()),
		..Default::default()
	};
	let card = crate::render(&contact);
	(contact, card)
}

#[test]
fn string_target_separates_cards() {
	let mut s = String::new();
	let mut target = StringTarget::new(&mut s);
	for (i, name) in ["A", "B"].iter().enumerate() {
		let (contact, card) = card_named(name);
		target.write_card(i + 1, &contact, &card).unwrap();
	}
	target.finish().unwrap();
	assert_eq!(
		s,
		"BEGIN:VCARD\r\nVERSION:3.0\r\nFN:A\r\nEND:VCARD\r\n\
		\r\n\
		BEGIN:VCARD\r\nVERSION:3.0\r\nFN:B\r\nEND:VCARD\r\n"
	);
}

#[test]
fn file_target_creates_parent() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nested").join("all.vcf");
	let mut target = FileTarget::new(&path);
	let (contact, card) = card_named("A");
	target.write_card(1, &contact, &card).unwrap();
	target.finish().unwrap();
	assert_eq!(
		fs::read_to_string(&path).unwrap(),
		"BEGIN:VCARD\r\nVERSION:3.0\r\nFN:A\r\nEND:VCARD\r\n"
	);
}

#[test]
fn directory_target_resolves_collisions() {
	let dir = tempfile::tempdir().unwrap();
	let out = dir.path().join("cards");
	let mut target = DirectoryTarget::new(&out);
	for (i, name) in ["Ann", "Ann", "A/B"].iter().enumerate() {
		let (contact, card) = card_named(name);
		target.write_card(i + 1, &contact, &card).unwrap();
	}
	let (contact, card) = (ResolvedContact::default(), crate::render(&ResolvedContact::default()));
	target.write_card(4, &contact, &card).unwrap();
	assert_eq!(
		target.written(),
		&[
			out.join("Ann.vcf"),
			out.join("Ann_1.vcf"),
			out.join("A_B.vcf"),
			out.join("Contact_4.vcf"),
		]
	);
	assert_eq!(
		fs::read_to_string(out.join("Ann_1.vcf")).unwrap(),
		"BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Ann\r\nEND:VCARD\r\n"
	);
}
