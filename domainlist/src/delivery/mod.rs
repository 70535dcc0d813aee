use std::{
	collections::HashMap,
	sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;
use tracing::{error, info};

use crate::DomainList;

mod recipient;
mod reply;

pub use recipient::{ParseRecipientError, Recipient};
pub use reply::{Reply, ReplyCode};

/// Where locally delivered mail ends up. Each user has a single inbox.
pub trait MailboxStore: Send + Sync {
	fn inbox_exists(&self, user: &str) -> Result<bool, MailboxError>;

	fn create_inbox(&self, user: &str) -> Result<(), MailboxError>;

	/// Appends to an existing inbox
	fn append(&self, user: &str, message: &[u8]) -> Result<(), MailboxError>;
}

#[derive(Debug, Error)]
pub enum MailboxError {
	#[error("there is no inbox for '{0}'")]
	NoSuchInbox(String),
	#[error("the mailbox store refused the message: {0}")]
	Refused(String),
	#[error("failed to write to the mailbox store")]
	Io(#[from] std::io::Error),
}

/// Inboxes held in memory, for tests and for embedding.
#[derive(Default)]
pub struct MemoryMailboxes {
	inboxes: Mutex<HashMap<String, Vec<Vec<u8>>>>,
}

impl MemoryMailboxes {
	pub fn new() -> Self {
		Self::default()
	}

	/// The messages in `user`'s inbox, oldest first
	pub fn messages(&self, user: &str) -> Vec<Vec<u8>> {
		self.inboxes
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.get(user)
			.cloned()
			.unwrap_or_default()
	}
}

impl MailboxStore for MemoryMailboxes {
	fn inbox_exists(&self, user: &str) -> Result<bool, MailboxError> {
		Ok(self
			.inboxes
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.contains_key(user))
	}

	fn create_inbox(&self, user: &str) -> Result<(), MailboxError> {
		self.inboxes
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.entry(user.to_owned())
			.or_default();
		Ok(())
	}

	fn append(&self, user: &str, message: &[u8]) -> Result<(), MailboxError> {
		self.inboxes
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.get_mut(user)
			.ok_or_else(|| MailboxError::NoSuchInbox(user.into()))?
			.push(message.to_vec());
		Ok(())
	}
}

/// Delivers mail for our own domains straight into the recipient's inbox.
pub struct LocalDelivery {
	domains: Arc<DomainList>,
	mailboxes: Arc<dyn MailboxStore>,
	virtual_hosting: bool,
}

impl LocalDelivery {
	/// With `virtual_hosting` users are known by their full address,
	/// otherwise only by their local part.
	pub fn new(
		domains: Arc<DomainList>,
		mailboxes: Arc<dyn MailboxStore>,
		virtual_hosting: bool,
	) -> Self {
		Self {
			domains,
			mailboxes,
			virtual_hosting,
		}
	}

	pub fn username(&self, recipient: &Recipient) -> String {
		if self.virtual_hosting {
			recipient.to_string()
		} else {
			recipient.local_part.clone()
		}
	}

	pub fn deliver(&self, recipient: &Recipient, message: &[u8]) -> Reply {
		match self.domains.contains_domain(&recipient.domain) {
			Ok(true) => (),
			Ok(false) => {
				info!(recipient = %recipient, "refusing mail for a domain that isn't local");
				return Reply::with_message(
					ReplyCode::PermanentMailFail,
					format!("5.7.1 Relaying to {} not permitted", recipient),
				);
			}
			Err(e) => {
				error!(recipient = %recipient, error = %e, "could not check the domain list");
				return Reply::with_message(
					ReplyCode::ProcessingError,
					format!("4.3.0 Temporary error checking domain of {}", recipient),
				);
			}
		}

		let username = self.username(recipient);
		match self.store(&username, message) {
			Ok(()) => Reply::with_message(ReplyCode::Okay, "2.6.0 Message received"),
			Err(e) => {
				error!(recipient = %recipient, user = %username, error = %e, "unexpected error handling DATA stream");
				Reply::with_message(
					ReplyCode::ProcessingError,
					format!("Temporary error deliver message to {}", recipient),
				)
			}
		}
	}

	fn store(&self, username: &str, message: &[u8]) -> Result<(), MailboxError> {
		if !self.mailboxes.inbox_exists(username)? {
			self.mailboxes.create_inbox(username)?;
		}

		self.mailboxes.append(username, message)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{dns::InMemoryDns, env::StaticEnv, store::MemoryDomainStore, DomainListOptions};

	struct BrokenMailboxes;

	impl MailboxStore for BrokenMailboxes {
		fn inbox_exists(&self, _user: &str) -> Result<bool, MailboxError> {
			Ok(true)
		}

		fn create_inbox(&self, _user: &str) -> Result<(), MailboxError> {
			Ok(())
		}

		fn append(&self, _user: &str, _message: &[u8]) -> Result<(), MailboxError> {
			Err(MailboxError::Refused("disk full".into()))
		}
	}

	fn domains() -> Arc<DomainList> {
		let list = DomainList::new(
			Arc::new(MemoryDomainStore::new()),
			Arc::new(InMemoryDns::new()),
			Arc::new(StaticEnv::new()),
		);
		list.configure(
			&DomainListOptions::default()
				.autodetect(false)
				.autodetect_ip(false)
				.default_domain("nyble.dev"),
		)
		.unwrap();

		Arc::new(list)
	}

	#[test]
	fn delivers_to_local_part() {
		let mailboxes = Arc::new(MemoryMailboxes::new());
		let delivery = LocalDelivery::new(domains(), mailboxes.clone(), false);

		let reply = delivery.deliver(&"gen@nyble.dev".parse().unwrap(), b"hello");
		assert_eq!(reply.code(), ReplyCode::Okay);

		let reply = delivery.deliver(&"gen@nyble.dev".parse().unwrap(), b"again");
		assert_eq!(reply.code(), ReplyCode::Okay);

		assert_eq!(
			mailboxes.messages("gen"),
			vec![b"hello".to_vec(), b"again".to_vec()]
		);
	}

	#[test]
	fn virtual_hosting_uses_full_address() {
		let mailboxes = Arc::new(MemoryMailboxes::new());
		let delivery = LocalDelivery::new(domains(), mailboxes.clone(), true);

		let reply = delivery.deliver(&"gen@nyble.dev".parse().unwrap(), b"hello");

		assert_eq!(reply.as_string(), "250 2.6.0 Message received\r\n");
		assert_eq!(mailboxes.messages("gen@nyble.dev"), vec![b"hello".to_vec()]);
		assert!(mailboxes.messages("gen").is_empty());
	}

	#[test]
	fn rejects_foreign_domains() {
		let mailboxes = Arc::new(MemoryMailboxes::new());
		let delivery = LocalDelivery::new(domains(), mailboxes.clone(), false);

		let reply = delivery.deliver(&"devon@nove.dev".parse().unwrap(), b"hello");
		assert!(reply.code().is_permanent());

		// domains are matched case-exactly
		let reply = delivery.deliver(&"gen@NYBLE.DEV".parse().unwrap(), b"hello");
		assert!(reply.code().is_permanent());

		assert!(!mailboxes.inbox_exists("devon").unwrap());
		assert!(!mailboxes.inbox_exists("gen").unwrap());
	}

	#[test]
	fn mailbox_failure_is_transient() {
		let delivery = LocalDelivery::new(domains(), Arc::new(BrokenMailboxes), false);

		let reply = delivery.deliver(&"gen@nyble.dev".parse().unwrap(), b"hello");

		assert_eq!(reply.code(), ReplyCode::ProcessingError);
		assert_eq!(
			reply.as_string(),
			"451 Temporary error deliver message to gen@nyble.dev\r\n"
		);
	}
}
