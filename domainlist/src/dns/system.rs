use std::net::IpAddr;

use gethostname::gethostname;
use hickory_resolver::{
	error::{ResolveError, ResolveErrorKind},
	Resolver,
};

use super::{DnsError, DnsService};

/// Resolves against the system's configured nameservers and hosts file.
pub struct SystemDns {
	resolver: Resolver,
}

impl SystemDns {
	pub fn new() -> Result<Self, DnsError> {
		Ok(Self {
			resolver: Resolver::from_system_conf()?,
		})
	}

	fn machine_name() -> String {
		gethostname().to_string_lossy().into_owned()
	}
}

// A name that doesn't exist is an unknown host, everything else is the
// resolver failing at its job.
fn classify(host: &str, err: ResolveError) -> DnsError {
	match err.kind() {
		ResolveErrorKind::NoRecordsFound { .. } => DnsError::UnknownHost(host.into()),
		_ => DnsError::Resolver(err),
	}
}

impl DnsService for SystemDns {
	fn all_by_name(&self, host: &str) -> Result<Vec<IpAddr>, DnsError> {
		let lookup = self
			.resolver
			.lookup_ip(host)
			.map_err(|e| classify(host, e))?;

		let addresses: Vec<IpAddr> = lookup.iter().collect();
		if addresses.is_empty() {
			Err(DnsError::UnknownHost(host.into()))
		} else {
			Ok(addresses)
		}
	}

	fn host_name(&self, addr: IpAddr) -> Result<String, DnsError> {
		let lookup = self.resolver.reverse_lookup(addr).map_err(|e| match e.kind() {
			ResolveErrorKind::NoRecordsFound { .. } => DnsError::UnmappedAddress(addr),
			_ => DnsError::Resolver(e),
		})?;

		lookup
			.iter()
			.next()
			.map(|ptr| ptr.to_utf8().trim_end_matches('.').to_owned())
			.ok_or(DnsError::UnmappedAddress(addr))
	}

	fn local_host(&self) -> Result<IpAddr, DnsError> {
		let name = Self::machine_name();
		self.all_by_name(&name)?
			.into_iter()
			.next()
			.ok_or(DnsError::NoLocalAddress)
	}

	// The machine already knows its own name. We only require that it resolves,
	// a PTR record for the local address is frequently missing.
	fn local_host_name(&self) -> Result<String, DnsError> {
		self.local_host()?;
		Ok(Self::machine_name())
	}

	fn mx_records(&self, host: &str) -> Result<Vec<String>, DnsError> {
		let lookup = self.resolver.mx_lookup(host).map_err(|e| classify(host, e))?;

		let mut mx_rec: Vec<(u16, String)> = lookup
			.iter()
			.map(|mx| (mx.preference(), mx.exchange().to_string()))
			.collect();

		mx_rec.sort_by(|(pref1, _), (pref2, _)| pref1.cmp(pref2));

		Ok(mx_rec.into_iter().map(|(_, domain)| domain).collect())
	}

	fn txt_records(&self, host: &str) -> Result<Vec<String>, DnsError> {
		let lookup = self
			.resolver
			.txt_lookup(host)
			.map_err(|e| classify(host, e))?;

		Ok(lookup
			.iter()
			.map(|txt| {
				txt.txt_data()
					.iter()
					.map(|data| String::from_utf8_lossy(data).into_owned())
					.collect::<String>()
			})
			.collect())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	#[ignore] //needs a working resolver
	fn resolves_localhost() {
		let dns = SystemDns::new().unwrap();
		let addrs = dns.all_by_name("localhost").unwrap();

		assert!(addrs.iter().any(|addr| addr.is_loopback()));
	}

	#[test]
	#[ignore] //needs a working resolver
	fn local_host_name_matches_machine() {
		let dns = SystemDns::new().unwrap();

		assert_eq!(dns.local_host_name().unwrap(), SystemDns::machine_name());
	}

	#[test]
	#[ignore] //needs a working resolver
	fn mx_records_for_mail_domain() {
		let dns = SystemDns::new().unwrap();
		let mx = dns.mx_records("gmail.com").unwrap();

		assert!(!mx.is_empty());
		assert!(mx.iter().all(|name| name.contains("google")));
	}

	#[test]
	#[ignore] //needs a working resolver
	fn txt_records_carry_spf() {
		let dns = SystemDns::new().unwrap();
		let txt = dns.txt_records("gmail.com").unwrap();

		assert!(txt.iter().any(|record| record.starts_with("v=spf1")));
	}
}
