use std::sync::{Mutex, PoisonError};

use super::{DomainStore, StoreError};
use crate::syntax::is_valid_domain;

#[derive(Default)]
pub struct MemoryDomainStore {
	domains: Mutex<Vec<String>>,
}

impl MemoryDomainStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// A store that already holds `domains`. They are taken as given, without
	/// validation or deduplication.
	pub fn with_domains<I, S>(domains: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			domains: Mutex::new(domains.into_iter().map(Into::into).collect()),
		}
	}
}

impl DomainStore for MemoryDomainStore {
	fn list(&self) -> Result<Vec<String>, StoreError> {
		Ok(self
			.domains
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone())
	}

	fn contains(&self, domain: &str) -> Result<bool, StoreError> {
		Ok(self
			.domains
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.any(|d| d == domain))
	}

	fn add(&self, domain: &str) -> Result<(), StoreError> {
		if !is_valid_domain(domain) {
			return Err(StoreError::InvalidDomain(domain.into()));
		}

		let mut domains = self.domains.lock().unwrap_or_else(PoisonError::into_inner);
		if domains.iter().any(|d| d == domain) {
			return Err(StoreError::Duplicate(domain.into()));
		}

		domains.push(domain.into());
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn keeps_insertion_order() {
		let store = MemoryDomainStore::new();
		store.add("nyble.dev").unwrap();
		store.add("nove.dev").unwrap();
		store.add("genbyte.dev").unwrap();

		assert_eq!(
			store.list().unwrap(),
			vec!["nyble.dev", "nove.dev", "genbyte.dev"]
		);
	}

	#[test]
	fn membership_is_case_exact() {
		let store = MemoryDomainStore::with_domains(["nove.dev"]);

		assert!(store.contains("nove.dev").unwrap());
		assert!(!store.contains("NOVE.dev").unwrap());
	}

	#[test]
	fn rejects_duplicates_and_garbage() {
		let store = MemoryDomainStore::with_domains(["nove.dev"]);

		assert!(matches!(
			store.add("nove.dev"),
			Err(StoreError::Duplicate(d)) if d == "nove.dev"
		));
		assert!(matches!(
			store.add("-nove.dev"),
			Err(StoreError::InvalidDomain(_))
		));
		assert_eq!(store.list().unwrap(), vec!["nove.dev"]);
	}
}
