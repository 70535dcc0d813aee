use thiserror::Error;

use crate::{dns::DnsError, store::StoreError};

#[derive(Debug, Error)]
pub enum DomainListError {
	#[error("null default domain, the domain list might not be configured yet")]
	NotConfigured,
	#[error("the domain store rejected the operation: {0}")]
	Store(#[from] StoreError),
	#[error("failed to resolve: {0}")]
	Resolution(#[from] DnsError),
}

/// The broad category of a [DomainListError], for callers that only need to
/// branch on what went wrong and not on the details.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	NotConfigured,
	StoreFailure,
	ResolutionFailure,
}

impl DomainListError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::NotConfigured => ErrorKind::NotConfigured,
			Self::Store(_) => ErrorKind::StoreFailure,
			Self::Resolution(_) => ErrorKind::ResolutionFailure,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn kinds_follow_variants() {
		assert_eq!(DomainListError::NotConfigured.kind(), ErrorKind::NotConfigured);

		let store: DomainListError = StoreError::Duplicate("nove.dev".into()).into();
		assert_eq!(store.kind(), ErrorKind::StoreFailure);

		let dns: DomainListError = DnsError::UnknownHost("nove.dev".into()).into();
		assert_eq!(dns.kind(), ErrorKind::ResolutionFailure);
	}
}
