use std::{
	net::{IpAddr, Ipv4Addr},
	sync::{PoisonError, RwLock},
};

use super::{DnsError, DnsService};

#[derive(Clone, Debug, Default)]
struct DnsRecord {
	addresses: Vec<IpAddr>,
	mx_records: Vec<String>,
	txt_records: Vec<String>,
}

/// A resolver that only knows what it has been told. Lookups never touch the
/// network, which makes it the resolver of choice for tests.
///
/// Records are kept in registration order. A reverse lookup returns the first
/// hostname holding the address; which one that is when several do is not
/// something callers should rely on.
pub struct InMemoryDns {
	records: RwLock<Vec<(String, DnsRecord)>>,
	local_host: RwLock<Option<IpAddr>>,
}

impl InMemoryDns {
	/// Creates a resolver that knows the loopback and unspecified addresses,
	/// with the local host at 127.0.0.1.
	pub fn new() -> Self {
		let seeded = [Ipv4Addr::UNSPECIFIED, Ipv4Addr::LOCALHOST]
			.into_iter()
			.map(|ip| {
				(
					ip.to_string(),
					DnsRecord {
						addresses: vec![IpAddr::V4(ip)],
						..Default::default()
					},
				)
			})
			.collect();

		Self {
			records: RwLock::new(seeded),
			local_host: RwLock::new(Some(IpAddr::V4(Ipv4Addr::LOCALHOST))),
		}
	}

	pub fn register_host<S: Into<String>>(&self, hostname: &str, address: IpAddr, mx_record: S) {
		self.register_record(hostname, vec![address], vec![mx_record.into()], vec![]);
	}

	/// Adds a record for `hostname`, replacing any it already had.
	pub fn register_record(
		&self,
		hostname: &str,
		addresses: Vec<IpAddr>,
		mx_records: Vec<String>,
		txt_records: Vec<String>,
	) {
		let record = DnsRecord {
			addresses,
			mx_records,
			txt_records,
		};

		let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
		match records.iter_mut().find(|(name, _)| name == hostname) {
			Some((_, existing)) => *existing = record,
			None => records.push((hostname.to_owned(), record)),
		}
	}

	pub fn drop_record(&self, hostname: &str) {
		self.records
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.retain(|(name, _)| name != hostname);
	}

	/// Sets the address reported for the local host. `None` makes the local
	/// host unresolvable.
	pub fn set_local_host(&self, addr: Option<IpAddr>) {
		*self.local_host.write().unwrap_or_else(PoisonError::into_inner) = addr;
	}

	fn host_record(&self, host: &str) -> Result<DnsRecord, DnsError> {
		self.records
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.find(|(name, _)| name == host)
			.map(|(_, record)| record.clone())
			.ok_or_else(|| DnsError::UnknownHost(host.into()))
	}
}

impl Default for InMemoryDns {
	fn default() -> Self {
		Self::new()
	}
}

impl DnsService for InMemoryDns {
	fn all_by_name(&self, host: &str) -> Result<Vec<IpAddr>, DnsError> {
		Ok(self.host_record(host)?.addresses)
	}

	fn host_name(&self, addr: IpAddr) -> Result<String, DnsError> {
		self.records
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.find(|(_, record)| record.addresses.contains(&addr))
			.map(|(name, _)| name.clone())
			.ok_or(DnsError::UnmappedAddress(addr))
	}

	fn local_host(&self) -> Result<IpAddr, DnsError> {
		self.local_host
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.ok_or(DnsError::NoLocalAddress)
	}

	fn mx_records(&self, host: &str) -> Result<Vec<String>, DnsError> {
		Ok(self.host_record(host)?.mx_records)
	}

	fn txt_records(&self, host: &str) -> Result<Vec<String>, DnsError> {
		Ok(self.host_record(host)?.txt_records)
	}
}
