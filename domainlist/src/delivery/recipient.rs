use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use thiserror::Error;

/// A forward path's mailbox: `local_part@domain`.
///
/// The domain is kept exactly as written. It is compared against the domain
/// list case-exactly, so normalizing it here would change which mail we accept.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Recipient {
	pub local_part: String,
	pub domain: String,
}

impl Recipient {
	pub fn new<L: Into<String>, D: Into<String>>(local_part: L, domain: D) -> Self {
		Self {
			local_part: local_part.into(),
			domain: domain.into(),
		}
	}
}

impl Display for Recipient {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}@{}", self.local_part, self.domain)
	}
}

impl FromStr for Recipient {
	type Err = ParseRecipientError;

	/// Parses `local@domain`, optionally wrapped in angle brackets
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let naked = s
			.strip_prefix('<')
			.and_then(|s| s.strip_suffix('>'))
			.unwrap_or(s);

		match naked.rsplit_once('@') {
			None => Err(ParseRecipientError::NoAtSign),
			Some((local, _)) if local.is_empty() => Err(ParseRecipientError::EmptyLocalPart),
			Some((_, domain)) if domain.is_empty() => Err(ParseRecipientError::EmptyDomain),
			Some((local, domain)) => Ok(Self::new(local, domain)),
		}
	}
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseRecipientError {
	#[error("no @ in the address")]
	NoAtSign,
	#[error("the local part is empty")]
	EmptyLocalPart,
	#[error("the domain is empty")]
	EmptyDomain,
}
