//! An [`ObjectStore`] backed by a directory, e.g. a network mount shared by several machines.
//!
//! The bucket is the directory itself and keys are relative paths inside it. Uploads are written to a
//! temporary sibling first and renamed into place, so readers on other machines never see partial files.

use async_trait::async_trait;
use roadcache_core::{ObjectStore, StoreError};
use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct DirectoryStore {}

impl DirectoryStore {
	pub fn new() -> DirectoryStore {
		DirectoryStore {}
	}

	fn object_path(bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
		if bucket.is_empty() {
			return Err(StoreError::InvalidConfig("store directory must not be empty".to_string()));
		}
		if key.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
			return Err(StoreError::InvalidConfig(format!("invalid object key '{key}'")));
		}
		Ok(Path::new(bucket).join(key))
	}
}

/// Collects all files below `dir` as `/` separated paths relative to `root`.
fn walk(root: &Path, dir: &Path, keys: &mut Vec<String>) -> std::io::Result<()> {
	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let file_type = entry.file_type()?;
		if entry.file_name().to_string_lossy().starts_with('.') {
			continue;
		}
		if file_type.is_dir() {
			walk(root, &entry.path(), keys)?;
		} else if file_type.is_file() {
			let path = entry.path();
			let Ok(relative) = path.strip_prefix(root) else {
				continue;
			};
			let key = relative
				.components()
				.map(|c| c.as_os_str().to_string_lossy())
				.collect::<Vec<_>>()
				.join("/");
			keys.push(key);
		}
	}
	Ok(())
}

#[async_trait]
impl ObjectStore for DirectoryStore {
	async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
		let path = Self::object_path(bucket, key)?;
		match fs::metadata(&path).await {
			Ok(meta) => Ok(meta.is_file()),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
			Err(err) => Err(StoreError::Transport(format!("failed to access {path:?}: {err}"))),
		}
	}

	async fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError> {
		let path = Self::object_path(bucket, key)?;
		let parent = path.parent().unwrap_or(Path::new(bucket));
		let part = parent.join(format!(".{}.part", Uuid::new_v4().simple()));

		let result = async {
			fs::create_dir_all(parent).await?;
			fs::copy(local_path, &part).await?;
			fs::rename(&part, &path).await
		}
		.await;
		if let Err(err) = result {
			fs::remove_file(&part).await.ok();
			return Err(StoreError::Io(err));
		}
		log::debug!("stored {path:?}");
		Ok(())
	}

	async fn download(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), StoreError> {
		let path = Self::object_path(bucket, key)?;
		let data = match fs::read(&path).await {
			Ok(data) => data,
			Err(err) if err.kind() == ErrorKind::NotFound => {
				return Err(StoreError::NotFound { key: key.to_string() });
			}
			// The store directory is the remote side, so a failed read is not a local persistence problem.
			Err(err) => return Err(StoreError::Transport(format!("failed to read {path:?}: {err}"))),
		};
		fs::write(local_path, data).await?;
		Ok(())
	}

	async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
		let root = PathBuf::from(bucket);
		if !root.is_dir() {
			return Ok(Vec::new());
		}
		let mut keys = Vec::new();
		walk(&root, &root, &mut keys).map_err(|err| StoreError::Transport(format!("failed to list {root:?}: {err}")))?;
		keys.retain(|key| key.starts_with(prefix));
		keys.sort();
		Ok(keys)
	}

	fn name(&self) -> &str {
		"directory"
	}
}
