/// What a delivery attempt answers with, as an SMTP reply.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
	pub code: ReplyCode,
	messages: Vec<String>,
}

impl Reply {
	pub fn new(code: ReplyCode) -> Self {
		Self {
			code,
			messages: vec![],
		}
	}

	pub fn with_message<S: Into<String>>(code: ReplyCode, message: S) -> Self {
		Self {
			code,
			messages: vec![message.into()],
		}
	}

	pub fn push(&mut self, message: &str) {
		self.messages.push(message.to_owned());
	}

	pub fn code(&self) -> ReplyCode {
		self.code
	}

	pub fn as_string(&self) -> String {
		let mut working = self.messages.clone();
		let mut ret = format!("{} ", self.code.as_code());

		if let Some(message) = working.pop() {
			ret.push_str(&message);
		}

		for message in working.into_iter().rev() {
			ret.insert_str(0, &format!("{}-{}\r\n", self.code.as_code(), message));
		}

		ret.push_str("\r\n");
		ret
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyCode {
	Okay,              // 250
	ProcessingError,   // 451
	PermanentMailFail, // 550
}

impl ReplyCode {
	pub fn as_code(self) -> u16 {
		match self {
			ReplyCode::Okay => 250,
			ReplyCode::ProcessingError => 451,
			ReplyCode::PermanentMailFail => 550,
		}
	}

	pub fn is_positive(self) -> bool {
		self.as_code() / 100 == 2
	}

	/// A failure that's worth retrying later
	pub fn is_transient(self) -> bool {
		self.as_code() / 100 == 4
	}

	pub fn is_permanent(self) -> bool {
		self.as_code() / 100 == 5
	}
}
