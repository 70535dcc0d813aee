use std::path::Path;

use confindent::Confindent;
use thiserror::Error;

use crate::LOCALHOST;

/// Options read by [DomainList::configure](crate::DomainList::configure).
#[derive(Clone, Debug, PartialEq)]
pub struct DomainListOptions {
	/// Add the local hostname to the domain list
	pub autodetect: bool,
	/// Add the addresses of every known domain to the domain list
	pub autodetect_ip: bool,
	/// The default domain. If this is left as `localhost` it's replaced by the
	/// hostname of the machine when that can be found.
	pub default_domain: String,
	/// Domains to register at configure time
	pub domain_names: Vec<String>,
}

impl Default for DomainListOptions {
	fn default() -> Self {
		Self {
			autodetect: true,
			autodetect_ip: true,
			default_domain: LOCALHOST.into(),
			domain_names: vec![],
		}
	}
}

impl DomainListOptions {
	pub fn autodetect(mut self, autodetect: bool) -> Self {
		self.autodetect = autodetect;
		self
	}

	pub fn autodetect_ip(mut self, autodetect_ip: bool) -> Self {
		self.autodetect_ip = autodetect_ip;
		self
	}

	pub fn default_domain<S: Into<String>>(mut self, domain: S) -> Self {
		self.default_domain = domain.into();
		self
	}

	pub fn domain_names<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.domain_names = names.into_iter().map(Into::into).collect();
		self
	}

	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let config = Confindent::from_file(path).map_err(|e| ConfigError::Unreadable {
			path: path.display().to_string(),
			reason: e.to_string(),
		})?;

		Self::from_confindent(&config)
	}

	/// Reads the options from a parsed config. Any key that's missing keeps
	/// its default.
	///
	/// ```text
	/// Autodetect true
	/// AutodetectIP no
	/// DefaultDomain nyble.dev
	/// DomainNames nyble.dev, nove.dev
	/// ```
	pub fn from_confindent(config: &Confindent) -> Result<Self, ConfigError> {
		let mut options = Self::default();

		if let Some(value) = config.child_value("Autodetect") {
			options.autodetect = parse_bool("Autodetect", value)?;
		}

		if let Some(value) = config.child_value("AutodetectIP") {
			options.autodetect_ip = parse_bool("AutodetectIP", value)?;
		}

		if let Some(value) = config.child_value("DefaultDomain") {
			options.default_domain = value.trim().into();
		}

		if let Some(joined) = config.child_value("DomainNames") {
			options.domain_names = joined
				.split(',')
				.map(str::trim)
				.filter(|name| !name.is_empty())
				.map(String::from)
				.collect();
		}

		Ok(options)
	}
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
	match value.trim().to_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" => Ok(false),
		_ => Err(ConfigError::NotABoolean {
			key,
			value: value.into(),
		}),
	}
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {reason}")]
	Unreadable { path: String, reason: String },
	#[error("'{value}' is not a boolean, which {key} must be")]
	NotABoolean { key: &'static str, value: String },
}

#[cfg(test)]
mod test {
	use super::*;

	fn options_from(contents: &str) -> Result<DomainListOptions, ConfigError> {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("domainlist.conf");
		std::fs::write(&path, contents).unwrap();

		DomainListOptions::from_file(&path)
	}

	#[test]
	fn defaults() {
		let options = DomainListOptions::default();

		assert!(options.autodetect);
		assert!(options.autodetect_ip);
		assert_eq!(options.default_domain, "localhost");
		assert!(options.domain_names.is_empty());
	}

	#[test]
	fn reads_every_key() {
		let options = options_from(
			"Autodetect no\nAutodetectIP FALSE\nDefaultDomain nyble.dev\nDomainNames nyble.dev, Nove.Dev,,genbyte.dev\n",
		)
		.unwrap();

		assert_eq!(
			options,
			DomainListOptions::default()
				.autodetect(false)
				.autodetect_ip(false)
				.default_domain("nyble.dev")
				.domain_names(["nyble.dev", "Nove.Dev", "genbyte.dev"])
		);
	}

	#[test]
	fn missing_keys_keep_defaults() {
		let options = options_from("DefaultDomain nyble.dev\n").unwrap();

		assert!(options.autodetect);
		assert!(options.autodetect_ip);
		assert_eq!(options.default_domain, "nyble.dev");
	}

	#[test]
	fn bad_boolean() {
		let err = options_from("Autodetect sometimes\n").unwrap_err();

		assert!(matches!(err, ConfigError::NotABoolean { key: "Autodetect", .. }));
	}

	#[test]
	fn missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = DomainListOptions::from_file(dir.path().join("nope.conf")).unwrap_err();

		assert!(matches!(err, ConfigError::Unreadable { .. }));
	}
}
