use pest::Parser;
use pest_derive::*;

#[derive(Parser)]
#[grammar = "domain.pest"]
struct GrammarParser;

/// Checks whether a string is a syntactically valid domain name. Case is not
/// considered, so `Nove.Dev` passes just like `nove.dev`.
pub fn is_valid_domain(domain: &str) -> bool {
	GrammarParser::parse(Rule::validate_domain, domain).is_ok()
}

#[cfg(test)]
mod test {
	use super::*;

	fn valid_hostnames() -> Vec<String> {
		let mut valid = vec![];
		let should_pass = ["domain", "0domain", "domain0", "0-domain", "domain-0", "Do--Main"];

		for name in should_pass {
			valid.push(name.to_string());
		}

		for name in should_pass {
			for name2 in should_pass {
				valid.push(format!("{}.{}", name, name2));
			}
		}

		valid
	}

	#[test]
	fn accepts_valid() {
		for domain in valid_hostnames() {
			assert!(is_valid_domain(&domain), "{} should be valid", domain);
		}
	}

	#[test]
	fn rejects_invalid() {
		for domain in valid_hostnames() {
			// No leading/trailing dots or hyphens
			for bad in [
				format!(".{}", domain),
				format!("{}.", domain),
				format!("-{}", domain),
				format!("{}-", domain),
			] {
				assert!(!is_valid_domain(&bad), "{} should be invalid", bad);
			}
		}

		assert!(!is_valid_domain(""));
		assert!(!is_valid_domain("nove..dev"));
		assert!(!is_valid_domain("nove dev"));
		assert!(!is_valid_domain("[10.0.0.1]"));
	}
}
