use std::{
	collections::HashSet,
	sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::{debug, error, info, warn};

use crate::{
	dns::DnsService, env::EnvProbe, store::DomainStore, DomainListError, DomainListOptions,
	ENV_DOMAIN,
};

/// Stands in for the default domain until a real one is chosen. While the
/// default domain is this, configuration may replace it with the hostname.
pub const LOCALHOST: &str = "localhost";

struct State {
	autodetect: bool,
	autodetect_ip: bool,
	default_domain: Option<String>,
}

/// Decides which domains we accept mail for.
///
/// The domain list is the union of three tiers, computed fresh on every query:
/// the domains in the store, the local hostname if autodetection is on, and
/// the addresses of all of those if IP autodetection is on. Every query can
/// therefore hit DNS once per domain; nothing is cached.
///
/// Both flags and the default domain sit behind one lock. `configure` holds it
/// for writing from start to finish, so queries never see a half-configured
/// list.
pub struct DomainList {
	store: Arc<dyn DomainStore>,
	dns: Arc<dyn DnsService>,
	env: Arc<dyn EnvProbe>,
	state: RwLock<State>,
}

impl DomainList {
	pub fn new(
		store: Arc<dyn DomainStore>,
		dns: Arc<dyn DnsService>,
		env: Arc<dyn EnvProbe>,
	) -> Self {
		Self {
			store,
			dns,
			env,
			state: RwLock::new(State {
				autodetect: true,
				autodetect_ip: true,
				default_domain: None,
			}),
		}
	}

	/// Applies `options`, in order: the autodetect flags, the default domain,
	/// the domain from the environment and finally the configured domains.
	///
	/// Trouble finding or registering the default domain is logged and
	/// otherwise ignored. Failing to register the environment domain or any of
	/// the configured ones stops configuration and is returned.
	pub fn configure(&self, options: &DomainListOptions) -> Result<(), DomainListError> {
		let mut state = self.write();

		Self::apply_autodetect(&mut state, options.autodetect);
		Self::apply_autodetect_ip(&mut state, options.autodetect_ip);

		self.configure_default_domain(&mut state, &options.default_domain);

		self.add_env_domain()?;
		self.add_configured_domains(&options.domain_names)
	}

	/// Whether we handle mail for `domain`. The comparison is case-exact.
	pub fn contains_domain(&self, domain: &str) -> Result<bool, DomainListError> {
		self.contains_domain_in(&self.read(), domain)
	}

	/// Every domain we handle mail for: the stored domains, then the detected
	/// hostname, then the detected addresses.
	pub fn get_domains(&self) -> Result<Vec<String>, DomainListError> {
		self.domains_in(&self.read())
	}

	pub fn get_default_domain(&self) -> Result<String, DomainListError> {
		self.read()
			.default_domain
			.clone()
			.ok_or(DomainListError::NotConfigured)
	}

	/// Set to true to add the hostname of the machine we're running on to
	/// the domain list.
	pub fn set_auto_detect(&self, autodetect: bool) {
		Self::apply_autodetect(&mut self.write(), autodetect);
	}

	/// Set to true to add the addresses of every domain to the domain list.
	pub fn set_auto_detect_ip(&self, autodetect_ip: bool) {
		Self::apply_autodetect_ip(&mut self.write(), autodetect_ip);
	}

	pub fn auto_detect(&self) -> bool {
		self.read().autodetect
	}

	pub fn auto_detect_ip(&self) -> bool {
		self.read().autodetect_ip
	}

	fn read(&self) -> RwLockReadGuard<'_, State> {
		self.state.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, State> {
		self.state.write().unwrap_or_else(PoisonError::into_inner)
	}

	fn apply_autodetect(state: &mut State, autodetect: bool) {
		info!(autodetect, "set autodetect");
		state.autodetect = autodetect;
	}

	fn apply_autodetect_ip(state: &mut State, autodetect_ip: bool) {
		info!(autodetect_ip, "set autodetect IP");
		state.autodetect_ip = autodetect_ip;
	}

	fn configure_default_domain(&self, state: &mut State, configured: &str) {
		if let Err(e) = self.set_default_domain(state, configured) {
			error!(domain = %configured, error = %e, "an error occurred while creating the default domain");
			return;
		}

		if state.default_domain.as_deref() != Some(LOCALHOST) {
			return;
		}

		match self.dns.local_host_name() {
			Ok(hostname) => {
				let hostname = hostname.to_lowercase();
				if let Err(e) = self.set_default_domain(state, &hostname) {
					error!(domain = %hostname, error = %e, "an error occurred while creating the default domain");
				}
			}
			Err(e) => warn!(error = %e, "unable to retrieve hostname"),
		}
	}

	// The default domain only changes once the domain is known to be ours,
	// registering it first if need be.
	fn set_default_domain(&self, state: &mut State, domain: &str) -> Result<(), DomainListError> {
		if !self.contains_domain_in(state, domain)? {
			self.store.add(domain)?;
		}

		state.default_domain = Some(domain.into());
		Ok(())
	}

	fn add_env_domain(&self) -> Result<(), DomainListError> {
		match self.env.var(ENV_DOMAIN) {
			Some(domain) if !domain.is_empty() => {
				info!(domain = %domain, "adding environment defined domain");
				self.store.add(&domain)?;
				Ok(())
			}
			_ => Ok(()),
		}
	}

	fn add_configured_domains(&self, names: &[String]) -> Result<(), DomainListError> {
		for name in names {
			if !self.store.contains(name)? {
				self.store.add(&name.to_lowercase())?;
			}
		}

		Ok(())
	}

	fn contains_domain_in(&self, state: &State, domain: &str) -> Result<bool, DomainListError> {
		Ok(self.store.contains(domain)? || self.domains_in(state)?.iter().any(|d| d == domain))
	}

	fn domains_in(&self, state: &State) -> Result<Vec<String>, DomainListError> {
		let mut domains = self.store.list()?;
		domains.extend(self.detect_domains(state));

		let addresses = self.detect_ips(state, &domains);
		domains.extend(addresses);

		for domain in &domains {
			debug!(domain = %domain, "handling mail for");
		}

		Ok(domains)
	}

	fn detect_domains(&self, state: &State) -> Vec<String> {
		if !state.autodetect {
			return vec![];
		}

		let hostname = self
			.dns
			.local_host_name()
			.unwrap_or_else(|_| LOCALHOST.to_owned());

		info!(hostname = %hostname, "local host is");
		if hostname != LOCALHOST {
			vec![hostname.to_lowercase()]
		} else {
			vec![]
		}
	}

	// One lookup per domain, in order. An address is only kept the first time
	// it's seen, no matter which domain it came from.
	fn detect_ips(&self, state: &State, domains: &[String]) -> Vec<String> {
		if !state.autodetect_ip {
			return vec![];
		}

		let mut seen = HashSet::new();
		let mut addresses = vec![];
		for domain in domains {
			let found = match self.dns.all_by_name(domain) {
				Ok(found) => found,
				Err(e) => {
					error!(domain = %domain, error = %e, "cannot get IP address(es)");
					continue;
				}
			};

			for addr in found {
				let addr = addr.to_string();
				if seen.insert(addr.clone()) {
					addresses.push(addr);
				}
			}
		}

		addresses
	}
}
