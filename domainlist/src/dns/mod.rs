use std::net::IpAddr;

use hickory_resolver::error::ResolveError;
use thiserror::Error;

mod memory;
mod system;

pub use memory::InMemoryDns;
pub use system::SystemDns;

/// Name resolution as the domain list needs it. Every call is synchronous and
/// may block on the network for as long as the implementation allows.
pub trait DnsService: Send + Sync {
	/// All addresses `host` resolves to, in the order the resolver gave them
	fn all_by_name(&self, host: &str) -> Result<Vec<IpAddr>, DnsError>;

	/// The first address `host` resolves to
	fn by_name(&self, host: &str) -> Result<IpAddr, DnsError> {
		self.all_by_name(host)?
			.into_iter()
			.next()
			.ok_or_else(|| DnsError::UnknownHost(host.into()))
	}

	/// The canonical hostname for an address
	fn host_name(&self, addr: IpAddr) -> Result<String, DnsError>;

	/// The address of the machine we're running on
	fn local_host(&self) -> Result<IpAddr, DnsError>;

	/// The name of the machine we're running on
	fn local_host_name(&self) -> Result<String, DnsError> {
		self.host_name(self.local_host()?)
	}

	/// Mail exchangers for `host`, most preferred first.
	fn mx_records(&self, host: &str) -> Result<Vec<String>, DnsError>;

	fn txt_records(&self, host: &str) -> Result<Vec<String>, DnsError>;
}

#[derive(Debug, Error)]
pub enum DnsError {
	#[error("unknown host '{0}'")]
	UnknownHost(String),
	#[error("no hostname is known for {0}")]
	UnmappedAddress(IpAddr),
	#[error("the local host has no address")]
	NoLocalAddress,
	#[error("failed to resolve domain name")]
	Resolver(#[from] ResolveError),
	#[error("failed to start the resolver")]
	Io(#[from] std::io::Error),
}

impl DnsError {
	/// Whether the name or address simply doesn't exist, as opposed to the
	/// lookup itself going wrong.
	pub fn is_unknown_host(&self) -> bool {
		matches!(
			self,
			Self::UnknownHost(_) | Self::UnmappedAddress(_) | Self::NoLocalAddress
		)
	}
}
