use std::{
	fs::OpenOptions,
	io::{ErrorKind, Write},
	path::PathBuf,
	sync::{Mutex, PoisonError},
};

use super::{DomainStore, StoreError};
use crate::syntax::is_valid_domain;

/// Keeps domains in a plain text file, one per line. Blank lines and lines
/// starting with `#` are ignored. The file is read on every query so edits
/// made by hand show up without a restart.
pub struct FileDomainStore {
	path: PathBuf,
	// Serializes the read-check-append in add
	write_lock: Mutex<()>,
}

impl FileDomainStore {
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self {
			path: path.into(),
			write_lock: Mutex::new(()),
		}
	}

	fn read_domains(&self) -> Result<Vec<String>, StoreError> {
		let contents = match std::fs::read_to_string(&self.path) {
			Ok(contents) => contents,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
			Err(e) => return Err(e.into()),
		};

		Ok(contents
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty() && !line.starts_with('#'))
			.map(String::from)
			.collect())
	}
}

impl DomainStore for FileDomainStore {
	fn list(&self) -> Result<Vec<String>, StoreError> {
		self.read_domains()
	}

	fn contains(&self, domain: &str) -> Result<bool, StoreError> {
		Ok(self.read_domains()?.iter().any(|d| d == domain))
	}

	fn add(&self, domain: &str) -> Result<(), StoreError> {
		if !is_valid_domain(domain) {
			return Err(StoreError::InvalidDomain(domain.into()));
		}

		let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
		if self.read_domains()?.iter().any(|d| d == domain) {
			return Err(StoreError::Duplicate(domain.into()));
		}

		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				std::fs::create_dir_all(parent)?;
			}
		}

		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.path)?;
		writeln!(file, "{}", domain)?;

		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn missing_file_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileDomainStore::new(dir.path().join("domains.list"));

		assert!(store.list().unwrap().is_empty());
		assert!(!store.contains("nove.dev").unwrap());
	}

	#[test]
	fn add_persists_across_instances() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("domains.list");

		let store = FileDomainStore::new(&path);
		store.add("nyble.dev").unwrap();
		store.add("Nove.Dev").unwrap();

		let reopened = FileDomainStore::new(&path);
		assert_eq!(reopened.list().unwrap(), vec!["nyble.dev", "Nove.Dev"]);
		assert!(reopened.contains("Nove.Dev").unwrap());
		assert!(!reopened.contains("nove.dev").unwrap());
	}

	#[test]
	fn skips_comments_and_blanks() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("domains.list");
		std::fs::write(&path, "# local domains\n\nnyble.dev\n  genbyte.dev  \n").unwrap();

		let store = FileDomainStore::new(&path);
		assert_eq!(store.list().unwrap(), vec!["nyble.dev", "genbyte.dev"]);
	}

	#[test]
	fn rejects_duplicates() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileDomainStore::new(dir.path().join("domains.list"));
		store.add("nyble.dev").unwrap();

		assert!(matches!(store.add("nyble.dev"), Err(StoreError::Duplicate(_))));
		assert!(matches!(store.add("nyble..dev"), Err(StoreError::InvalidDomain(_))));
		assert_eq!(store.list().unwrap(), vec!["nyble.dev"]);
	}
}
