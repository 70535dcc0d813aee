mod config;

use std::{process::ExitCode, sync::Arc};

use domainlist::{dns::SystemDns, env::ProcessEnv, store::FileDomainStore, DomainList};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;

fn init_logging(level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn main() -> ExitCode {
	let config = match Config::get() {
		Ok(Some(conf)) => conf,
		Ok(None) => return ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("{}", e);
			return ExitCode::from(2);
		}
	};

	init_logging(&config.log_level);

	let dns = match SystemDns::new() {
		Ok(dns) => dns,
		Err(e) => {
			error!(error = %e, "failed to start the resolver");
			return ExitCode::FAILURE;
		}
	};

	info!(store = %config.store.display(), "using domain store");
	let list = DomainList::new(
		Arc::new(FileDomainStore::new(&config.store)),
		Arc::new(dns),
		Arc::new(ProcessEnv),
	);

	if let Err(e) = list.configure(&config.options) {
		error!(error = %e, "failed to configure the domain list");
		return ExitCode::FAILURE;
	}

	if let Some(domain) = config.check {
		return match list.contains_domain(&domain) {
			Ok(true) => {
				println!("{} is local", domain);
				ExitCode::SUCCESS
			}
			Ok(false) => {
				println!("{} is not local", domain);
				ExitCode::from(1)
			}
			Err(e) => {
				error!(domain = %domain, error = %e, "failed to check domain");
				ExitCode::FAILURE
			}
		};
	}

	match list.get_default_domain() {
		Ok(domain) => println!("default domain: {}", domain),
		Err(e) => eprintln!("{}", e),
	}

	match list.get_domains() {
		Ok(domains) => {
			for domain in domains {
				println!("{}", domain);
			}
			ExitCode::SUCCESS
		}
		Err(e) => {
			error!(error = %e, "failed to list domains");
			ExitCode::FAILURE
		}
	}
}
