pub mod delivery;
pub mod dns;
pub mod env;
mod error;
pub mod options;
mod resolver;
pub mod store;
pub mod syntax;

pub use error::{DomainListError, ErrorKind};
pub use options::DomainListOptions;
pub use resolver::{DomainList, LOCALHOST};

/// The environment variable whose value is registered as a domain during configuration
pub const ENV_DOMAIN: &str = "DOMAIN";
