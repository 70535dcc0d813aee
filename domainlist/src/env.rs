use std::collections::HashMap;

/// Reads a single named value from the environment.
pub trait EnvProbe: Send + Sync {
	fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the running process
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvProbe for ProcessEnv {
	fn var(&self, name: &str) -> Option<String> {
		std::env::var(name).ok()
	}
}

/// A fixed set of variables, independent of the process environment.
#[derive(Clone, Debug, Default)]
pub struct StaticEnv {
	vars: HashMap<String, String>,
}

impl StaticEnv {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
		self.vars.insert(name.into(), value.into());
		self
	}
}

impl EnvProbe for StaticEnv {
	fn var(&self, name: &str) -> Option<String> {
		self.vars.get(name).cloned()
	}
}
