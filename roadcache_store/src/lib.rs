//! Object store clients for the remote tier of roadcache.
//!
//! - [`s3::S3Store`]: S3 and S3 compatible services over HTTP.
//! - [`DirectoryStore`]: a local or mounted directory.
//!
//! [`open_store`] picks the client that matches a [`RemoteNamespace`].

mod directory;
mod remote_config;
pub mod s3;

pub use directory::DirectoryStore;
pub use remote_config::*;

use roadcache_core::{NamespaceScheme, ObjectStore, RemoteNamespace, RemoteTier, StoreError};
use std::sync::Arc;

/// Creates the object store client for `namespace`.
///
/// Configuration errors (an invalid endpoint, for instance) are reported here, before any request is sent.
pub fn open_store(namespace: &RemoteNamespace, config: &RemoteConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
	Ok(match namespace.scheme {
		NamespaceScheme::S3 => Arc::new(s3::S3Store::new(config)?),
		NamespaceScheme::File => Arc::new(DirectoryStore::new()),
	})
}

/// Creates the remote tier for `namespace`.
pub fn open_remote_tier(namespace: &RemoteNamespace, config: &RemoteConfig) -> Result<RemoteTier, StoreError> {
	let store = open_store(namespace, config)?;
	log::debug!("using {} for {namespace}", store.name());
	Ok(RemoteTier::new(store, namespace.clone()))
}
