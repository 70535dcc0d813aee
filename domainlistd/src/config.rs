use std::path::PathBuf;

use confindent::Confindent;
use domainlist::{options::ConfigError as OptionsError, DomainListOptions};
use getopts::{Matches, Options};
use thiserror::Error;

const DEFAULT_CONFIG: &str = "/etc/domainlist/domainlist.conf";
const FALLBACK_CONFIG: &str = "domainlist.conf";

pub struct Config {
	pub options: DomainListOptions,
	pub store: PathBuf,
	pub check: Option<String>,
	pub log_level: String,
}

#[allow(clippy::or_fun_call)]
impl Config {
	fn print_usage<S: AsRef<str>>(prgm: S, opts: &Options) {
		let brief = format!("Usage: {} [options]", prgm.as_ref());
		println!("{}", opts.usage(&brief));
	}

	fn opts() -> Options {
		let mut opts = Options::new();
		opts.optflag("h", "help", "Print this help message");
		opts.optopt(
			"c",
			"config",
			&format!(
				"An alternate location to read the config from\nDefault: {}",
				DEFAULT_CONFIG
			),
			"PATH",
		);
		opts.optopt(
			"s",
			"store",
			"The file registered domains are kept in\nDefault: domains.list",
			"PATH",
		);
		opts.optopt(
			"",
			"check",
			"Exit successfully only if we accept mail for DOMAIN",
			"DOMAIN",
		);
		opts.optopt(
			"",
			"log",
			"Log level, overridden by RUST_LOG\nDefault: info",
			"LEVEL",
		);
		opts
	}

	/// Reads the command line and the config file. `None` means the help
	/// message was asked for and printed.
	pub fn get() -> Result<Option<Self>, ConfigError> {
		let args: Vec<String> = std::env::args().collect();
		Self::from_args(&args)
	}

	fn from_args(args: &[String]) -> Result<Option<Self>, ConfigError> {
		let opts = Self::opts();
		let matches = opts.parse(&args[1..])?;

		if matches.opt_present("help") {
			Self::print_usage(&args[0], &opts);
			return Ok(None);
		}

		// An explicitly given config has to exist. Otherwise we try the usual
		// places and run on defaults if there's nothing there.
		let config = match matches.opt_str("config") {
			Some(path) => Some(Confindent::from_file(&path).map_err(|e| {
				ConfigError::Unreadable {
					path,
					reason: e.to_string(),
				}
			})?),
			None => Confindent::from_file(DEFAULT_CONFIG)
				.or(Confindent::from_file(FALLBACK_CONFIG))
				.ok(),
		};

		let options = match &config {
			None => DomainListOptions::default(),
			Some(config) => DomainListOptions::from_confindent(config)?,
		};

		let store = find_value(&matches, config.as_ref(), "store", "Store")
			.unwrap_or("domains.list".into());
		let log_level =
			find_value(&matches, config.as_ref(), "log", "LogLevel").unwrap_or("info".into());

		Ok(Some(Self {
			options,
			store: PathBuf::from(store),
			check: matches.opt_str("check"),
			log_level,
		}))
	}
}

// Options specified on the command line take priority over the config file.
fn find_value(
	matches: &Matches,
	config: Option<&Confindent>,
	cli_key: &str,
	conf_key: &str,
) -> Option<String> {
	matches
		.opt_str(cli_key)
		.or_else(|| config.and_then(|c| c.child_value(conf_key)).map(|s| s.into()))
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("{0}")]
	Usage(#[from] getopts::Fail),
	#[error("failed to parse conf file {path}: {reason}")]
	Unreadable { path: String, reason: String },
	#[error("{0}")]
	Options(#[from] OptionsError),
}
