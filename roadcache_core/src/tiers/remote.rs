//! The remote tier: an [`ObjectStore`] bound to a [`RemoteNamespace`].

use super::Probe;
use crate::{CacheKey, ObjectStore, RemoteNamespace, StoreError};
use std::{fmt::Debug, path::Path, sync::Arc};

#[derive(Clone)]
pub struct RemoteTier {
	store: Arc<dyn ObjectStore>,
	namespace: RemoteNamespace,
}

impl RemoteTier {
	pub fn new(store: Arc<dyn ObjectStore>, namespace: RemoteNamespace) -> Self {
		Self { store, namespace }
	}

	pub fn namespace(&self) -> &RemoteNamespace {
		&self.namespace
	}

	pub fn remote_key(&self, key: &CacheKey) -> String {
		key.remote_key(&self.namespace.prefix)
	}

	/// Human readable location of `remote_key`, e.g. `bucket/graphs/Berlin_drive.graphml`.
	pub fn describe(&self, remote_key: &str) -> String {
		format!("{}/{remote_key}", self.namespace.bucket.trim_end_matches('/'))
	}

	pub async fn probe(&self, remote_key: &str) -> Probe<()> {
		Probe::from_exists(self.store.exists(&self.namespace.bucket, remote_key).await, ())
	}

	pub async fn download(&self, remote_key: &str, local_path: &Path) -> Result<(), StoreError> {
		self
			.store
			.download(&self.namespace.bucket, remote_key, local_path)
			.await
	}

	pub async fn upload(&self, local_path: &Path, remote_key: &str) -> Result<(), StoreError> {
		self
			.store
			.upload(local_path, &self.namespace.bucket, remote_key)
			.await
	}

	/// Lists the keys below the namespace prefix, with the prefix removed.
	pub async fn list(&self) -> Result<Vec<String>, StoreError> {
		let prefix = if self.namespace.prefix.is_empty() {
			String::new()
		} else {
			format!("{}/", self.namespace.prefix)
		};
		let mut keys: Vec<String> = self
			.store
			.list(&self.namespace.bucket, &prefix)
			.await?
			.into_iter()
			.filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
			.filter(|key| !key.is_empty() && !key.contains('/'))
			.collect();
		keys.sort();
		Ok(keys)
	}
}

impl Debug for RemoteTier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RemoteTier")
			.field("store", &self.store.name())
			.field("namespace", &self.namespace)
			.finish()
	}
}
