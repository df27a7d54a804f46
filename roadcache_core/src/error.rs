//! Error types of the tiered resolver and the object store capability.
//!
//! "Not found" is not an error of the resolver: tier probes return [`crate::Probe::NotFound`].
//! Only object store calls carry [`StoreError::NotFound`], so that a download of a vanished object can be
//! told apart from a broken connection.

use crate::{ResourceRequest, Tier};
use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure of an object store call.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The object does not exist.
	#[error("object '{key}' not found")]
	NotFound { key: String },

	/// The store could not be reached.
	#[error("transport error: {0}")]
	Transport(String),

	/// The store answered with an unexpected status, e.g. 403 for missing permissions.
	#[error("unexpected status {status}: {message}")]
	Status { status: u16, message: String },

	/// Reading or writing a local file failed.
	#[error(transparent)]
	Io(#[from] io::Error),

	/// The store or namespace is misconfigured.
	#[error("invalid store configuration: {0}")]
	InvalidConfig(String),
}

impl StoreError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, StoreError::NotFound { .. })
	}
}

/// Fatal failure of a resolve call.
#[derive(Debug, Error)]
pub enum ResolveError {
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	/// A cached file exists but could not be read.
	#[error("failed to read cached graph {path:?}")]
	LocalRead {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The graph was obtained but could not be written to the local cache.
	#[error("failed to persist graph to {path:?}")]
	Persistence {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The remote store reported the object, but the download failed.
	#[error("failed to download '{key}' from the remote store")]
	Download {
		key: String,
		#[source]
		source: StoreError,
	},

	/// The origin could not produce the graph.
	#[error("origin failed to generate {request}")]
	Origin {
		request: ResourceRequest,
		#[source]
		source: anyhow::Error,
	},
}

impl ResolveError {
	/// The tier whose failure ended the call.
	pub fn stage(&self) -> Option<Tier> {
		match self {
			ResolveError::InvalidRequest(_) => None,
			ResolveError::LocalRead { .. } | ResolveError::Persistence { .. } => Some(Tier::Local),
			ResolveError::Download { .. } => Some(Tier::Remote),
			ResolveError::Origin { .. } => Some(Tier::Origin),
		}
	}

	/// The resource could not be obtained from any tier.
	pub fn is_unavailable(&self) -> bool {
		matches!(self, ResolveError::Origin { .. } | ResolveError::Download { .. })
	}

	/// The resource was obtained, but could not be cached locally.
	pub fn is_not_durable(&self) -> bool {
		matches!(self, ResolveError::Persistence { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::anyhow;

	#[test]
	fn classification() {
		let persistence = ResolveError::Persistence {
			path: PathBuf::from("/cache/a.graphml"),
			source: io::Error::other("disk full"),
		};
		assert_eq!(persistence.stage(), Some(Tier::Local));
		assert!(persistence.is_not_durable());
		assert!(!persistence.is_unavailable());

		let origin = ResolveError::Origin {
			request: ResourceRequest::new("Nowhere", "drive"),
			source: anyhow!("no such place"),
		};
		assert_eq!(origin.stage(), Some(Tier::Origin));
		assert!(origin.is_unavailable());
		assert_eq!(origin.to_string(), "origin failed to generate 'Nowhere' (drive)");

		let download = ResolveError::Download {
			key: "graphs/a.graphml".to_string(),
			source: StoreError::Transport("connection reset".to_string()),
		};
		assert_eq!(download.stage(), Some(Tier::Remote));

		assert_eq!(ResolveError::InvalidRequest("empty".to_string()).stage(), None);
	}

	#[test]
	fn store_error_messages() {
		assert!(StoreError::NotFound { key: "k".to_string() }.is_not_found());
		assert!(!StoreError::Transport("x".to_string()).is_not_found());
		assert_eq!(
			StoreError::Status {
				status: 403,
				message: "AccessDenied".to_string()
			}
			.to_string(),
			"unexpected status 403: AccessDenied"
		);
	}
}
