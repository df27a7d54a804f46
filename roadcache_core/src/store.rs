//! This module defines the [`ObjectStore`] capability used by the remote tier.
//!
//! # Overview
//!
//! An object store keeps one object per cache key inside a bucket. Implementations live in
//! `roadcache_store` (S3 over HTTP, a shared directory); tests use [`crate::testing::MockObjectStore`].
//!
//! All calls distinguish "confirmed absent" from "the call failed":
//! - `exists` answers `Ok(false)` for a missing object and `Err` only for transport or permission problems,
//! - `download` answers `Err(StoreError::NotFound)` for a missing object.
//!
//! Implementations apply their own timeouts and retries; the resolver never calls a tier twice.

use crate::StoreError;
use async_trait::async_trait;
use std::{fmt::Debug, path::Path};

#[async_trait]
pub trait ObjectStore: Debug + Send + Sync {
	/// Checks whether `key` exists in `bucket`.
	async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError>;

	/// Uploads the file at `local_path` as `key`, replacing an existing object.
	async fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError>;

	/// Downloads `key` into the file at `local_path`, creating or truncating it.
	async fn download(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), StoreError>;

	/// Lists all keys in `bucket` that start with `prefix`.
	async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError>;

	/// Gets the name of the store for messages.
	fn name(&self) -> &str;
}
