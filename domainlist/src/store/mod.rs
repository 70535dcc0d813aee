use thiserror::Error;

mod file;
mod memory;

pub use file::FileDomainStore;
pub use memory::MemoryDomainStore;

/// Durable storage for the domains that were explicitly registered. Nothing is
/// ever removed through this interface.
pub trait DomainStore: Send + Sync {
	/// Every stored domain, in the order they were added
	fn list(&self) -> Result<Vec<String>, StoreError>;

	/// Case-exact membership check
	fn contains(&self, domain: &str) -> Result<bool, StoreError>;

	fn add(&self, domain: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("'{0}' is already a registered domain")]
	Duplicate(String),
	#[error("'{0}' is not a valid domain name")]
	InvalidDomain(String),
	#[error("the domain store is unavailable")]
	Unavailable(#[from] std::io::Error),
}
