//! Connection settings of the remote store.
//!
//! Values from the configuration file win. Missing values are taken from the usual AWS environment
//! variables, and `LOCALSTACK_ENDPOINT_URL` switches to a local S3 emulator.

use crate::s3::Credentials;
use serde::Deserialize;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
	/// S3 endpoint, e.g. `http://localhost:4566`. Defaults to `https://s3.<region>.amazonaws.com`.
	pub endpoint_url: Option<String>,
	pub region: Option<String>,
	pub access_key_id: Option<String>,
	pub secret_access_key: Option<String>,
	pub session_token: Option<String>,
	pub timeout_seconds: Option<u64>,
}

impl RemoteConfig {
	/// Fills missing values from the process environment.
	pub fn with_env(&self) -> RemoteConfig {
		self.with_env_from(|name| std::env::var(name).ok())
	}

	/// Fills missing values using `lookup` to read environment variables.
	pub fn with_env_from(&self, lookup: impl Fn(&str) -> Option<String>) -> RemoteConfig {
		let first = |names: &[&str]| {
			names
				.iter()
				.find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
		};
		RemoteConfig {
			endpoint_url: self
				.endpoint_url
				.clone()
				.or_else(|| first(&["AWS_ENDPOINT_URL", "LOCALSTACK_ENDPOINT_URL"])),
			region: self
				.region
				.clone()
				.or_else(|| first(&["AWS_REGION", "AWS_DEFAULT_REGION"])),
			access_key_id: self.access_key_id.clone().or_else(|| first(&["AWS_ACCESS_KEY_ID"])),
			secret_access_key: self
				.secret_access_key
				.clone()
				.or_else(|| first(&["AWS_SECRET_ACCESS_KEY"])),
			session_token: self.session_token.clone().or_else(|| first(&["AWS_SESSION_TOKEN"])),
			timeout_seconds: self.timeout_seconds,
		}
	}

	pub fn region(&self) -> &str {
		self.region.as_deref().unwrap_or(DEFAULT_REGION)
	}

	pub fn endpoint(&self) -> String {
		match &self.endpoint_url {
			Some(url) => url.trim_end_matches('/').to_string(),
			None => format!("https://s3.{}.amazonaws.com", self.region()),
		}
	}

	pub fn timeout_seconds(&self) -> u64 {
		self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
	}

	/// Credentials, if both the access key id and the secret are known.
	pub fn credentials(&self) -> Option<Credentials> {
		Some(Credentials {
			access_key_id: self.access_key_id.clone()?,
			secret_access_key: self.secret_access_key.clone()?,
			session_token: self.session_token.clone(),
		})
	}
}
