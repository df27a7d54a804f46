//! Where remote copies of cached graphs live.
//!
//! A namespace is written as a bucket name (`my-bucket`), an S3 URL (`s3://my-bucket/some/prefix`) or a
//! directory URL (`file:///mnt/shared/graphs`). Without an explicit prefix, objects are stored below
//! [`DEFAULT_PREFIX`].

use crate::StoreError;
use std::{fmt::Display, str::FromStr};

pub const DEFAULT_PREFIX: &str = "graphs";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespaceScheme {
	S3,
	File,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteNamespace {
	pub scheme: NamespaceScheme,
	/// Bucket name, or the store directory for [`NamespaceScheme::File`].
	pub bucket: String,
	pub prefix: String,
}

impl RemoteNamespace {
	pub fn new_s3(bucket: &str, prefix: &str) -> Self {
		Self {
			scheme: NamespaceScheme::S3,
			bucket: bucket.to_string(),
			prefix: prefix.trim_matches('/').to_string(),
		}
	}

	pub fn new_file(directory: &str, prefix: &str) -> Self {
		Self {
			scheme: NamespaceScheme::File,
			bucket: directory.to_string(),
			prefix: prefix.trim_matches('/').to_string(),
		}
	}

	fn parse_s3(rest: &str) -> Result<Self, StoreError> {
		let (bucket, prefix) = match rest.split_once('/') {
			Some((bucket, prefix)) => (bucket, prefix),
			None => (rest, DEFAULT_PREFIX),
		};
		if bucket.is_empty() {
			return Err(StoreError::InvalidConfig(format!("missing bucket name in namespace '{rest}'")));
		}
		if !bucket
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.'))
		{
			return Err(StoreError::InvalidConfig(format!("invalid bucket name '{bucket}'")));
		}
		Ok(Self::new_s3(bucket, prefix))
	}
}

impl FromStr for RemoteNamespace {
	type Err = StoreError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let text = text.trim();
		if let Some(rest) = text.strip_prefix("s3://") {
			Self::parse_s3(rest)
		} else if let Some(directory) = text.strip_prefix("file://") {
			if directory.is_empty() {
				return Err(StoreError::InvalidConfig("missing directory in 'file://' namespace".to_string()));
			}
			Ok(Self::new_file(directory, DEFAULT_PREFIX))
		} else if text.contains("://") {
			Err(StoreError::InvalidConfig(format!(
				"unsupported namespace '{text}', expected 's3://…', 'file://…' or a bucket name"
			)))
		} else {
			Self::parse_s3(text)
		}
	}
}

impl Display for RemoteNamespace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let scheme = match self.scheme {
			NamespaceScheme::S3 => "s3",
			NamespaceScheme::File => "file",
		};
		write!(f, "{scheme}://{}/{}", self.bucket.trim_end_matches('/'), self.prefix)
	}
}
