use std::fmt::Display;

/// The resolution layers, ordered by ascending cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
	Local,
	Remote,
	Origin,
}

impl Tier {
	pub fn as_str(&self) -> &'static str {
		match self {
			Tier::Local => "local cache",
			Tier::Remote => "remote store",
			Tier::Origin => "origin",
		}
	}
}

impl Display for Tier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
