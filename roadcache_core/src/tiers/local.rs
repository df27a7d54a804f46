//! The local tier: one file per cache key inside a cache directory.
//!
//! Files are written atomically. Data goes to a uniquely named `*.part` sibling first and is then renamed
//! over the final path, so a concurrent reader never sees a half written graph and the last writer wins.

use super::Probe;
use crate::{Blob, CacheKey, GRAPH_EXTENSION, StoreError};
use std::{
	fmt::Debug,
	fs::{create_dir_all, read_dir, remove_file, rename, write},
	io::{self, ErrorKind},
	path::{Path, PathBuf},
};
use uuid::Uuid;

pub struct LocalTier {
	root: PathBuf, // path to cache directory
}

impl LocalTier {
	/// Opens the cache directory at `root`, creating it if it does not exist.
	pub fn open(root: &Path) -> io::Result<Self> {
		if !root.is_dir() {
			create_dir_all(root)?;
		}
		Ok(Self {
			root: root.to_path_buf(),
		})
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn path_for(&self, key: &CacheKey) -> PathBuf {
		key.local_path(&self.root)
	}

	/// Looks for the cached file of `key`.
	pub fn probe(&self, key: &CacheKey) -> Probe<PathBuf> {
		let path = self.path_for(key);
		match path.metadata() {
			Ok(meta) if meta.is_file() => Probe::Found(path),
			Ok(_) => Probe::Failed(StoreError::Io(io::Error::other(format!("{path:?} is not a file")))),
			Err(err) if err.kind() == ErrorKind::NotFound => Probe::NotFound,
			Err(err) => Probe::Failed(StoreError::Io(err)),
		}
	}

	pub fn read(&self, path: &Path) -> io::Result<Blob> {
		Blob::load_from_file(path)
	}

	/// Writes `blob` as the cached file of `key` and returns its path.
	pub fn persist(&self, key: &CacheKey, blob: &Blob) -> io::Result<PathBuf> {
		let part = self.part_path(key);
		if let Err(err) = write(&part, blob.as_slice()) {
			self.discard(&part);
			return Err(err);
		}
		self.commit(&part, key)
	}

	/// A fresh temporary path next to the cached file of `key`.
	pub fn part_path(&self, key: &CacheKey) -> PathBuf {
		self.root.join(format!(".{key}.{}.part", Uuid::new_v4().simple()))
	}

	/// Moves a completely written temporary file into place.
	pub fn commit(&self, part: &Path, key: &CacheKey) -> io::Result<PathBuf> {
		let path = self.path_for(key);
		if let Err(err) = rename(part, &path) {
			self.discard(part);
			return Err(err);
		}
		Ok(path)
	}

	/// Removes a temporary file, ignoring a file that was never created.
	pub fn discard(&self, part: &Path) {
		remove_file(part).ok();
	}

	/// Lists the keys of all cached graphs, sorted.
	pub fn list(&self) -> io::Result<Vec<String>> {
		let mut keys = Vec::new();
		for entry in read_dir(&self.root)? {
			let entry = entry?;
			if !entry.file_type()?.is_file() {
				continue;
			}
			let name = entry.file_name().to_string_lossy().to_string();
			if name.starts_with('.') {
				continue;
			}
			if Path::new(&name).extension().is_some_and(|ext| ext == GRAPH_EXTENSION) {
				keys.push(name);
			}
		}
		keys.sort();
		Ok(keys)
	}
}

impl Debug for LocalTier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LocalTier").field("root", &self.root).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::TempDir;

	fn new_tier() -> (TempDir, LocalTier) {
		let dir = tempfile::tempdir().expect("tempdir");
		let tier = LocalTier::open(&dir.path().join("cache")).expect("open");
		(dir, tier)
	}

	#[test]
	fn open_creates_nested_directory() -> io::Result<()> {
		let dir = tempfile::tempdir()?;
		let root = dir.path().join("a/b/c");
		assert!(!root.exists());
		let tier = LocalTier::open(&root)?;
		assert!(root.is_dir());
		assert_eq!(tier.root(), root.as_path());
		// opening again is fine
		LocalTier::open(&root)?;
		Ok(())
	}

	#[test]
	fn open_fails_on_a_file() -> io::Result<()> {
		let dir = tempfile::tempdir()?;
		let file = dir.path().join("file");
		write(&file, b"x")?;
		assert!(LocalTier::open(&file).is_err());
		Ok(())
	}

	#[test]
	fn probe_persist_read() -> io::Result<()> {
		let (_dir, tier) = new_tier();
		let key = CacheKey::derive("Berlin", "drive");
		assert!(matches!(tier.probe(&key), Probe::NotFound));

		let path = tier.persist(&key, &Blob::from("<graphml/>"))?;
		assert_eq!(path, tier.root().join("Berlin_drive.graphml"));

		match tier.probe(&key) {
			Probe::Found(found) => {
				assert_eq!(found, path);
				assert_eq!(tier.read(&found)?, Blob::from("<graphml/>"));
			}
			other => panic!("unexpected probe result {other:?}"),
		}
		Ok(())
	}

	#[test]
	fn persist_overwrites_and_leaves_no_part_files() -> io::Result<()> {
		let (_dir, tier) = new_tier();
		let key = CacheKey::derive("Berlin", "walk");
		tier.persist(&key, &Blob::from("first"))?;
		tier.persist(&key, &Blob::from("second"))?;
		assert_eq!(tier.read(&tier.path_for(&key))?.as_str(), Some("second"));

		let entries = read_dir(tier.root())?.count();
		assert_eq!(entries, 1);
		Ok(())
	}

	#[test]
	fn persist_fails_when_directory_vanished() -> io::Result<()> {
		let (_dir, tier) = new_tier();
		std::fs::remove_dir_all(tier.root())?;
		let key = CacheKey::derive("Berlin", "walk");
		assert!(tier.persist(&key, &Blob::from("x")).is_err());
		Ok(())
	}

	#[test]
	fn probe_reports_directory_in_place_of_file() -> io::Result<()> {
		let (_dir, tier) = new_tier();
		let key = CacheKey::derive("Berlin", "bike");
		create_dir_all(tier.path_for(&key))?;
		assert!(matches!(tier.probe(&key), Probe::Failed(StoreError::Io(_))));
		Ok(())
	}

	#[test]
	fn part_paths_are_unique_and_hidden() {
		let (_dir, tier) = new_tier();
		let key = CacheKey::derive("Berlin", "drive");
		let a = tier.part_path(&key);
		let b = tier.part_path(&key);
		assert_ne!(a, b);
		let name = a.file_name().unwrap().to_str().unwrap();
		assert!(name.starts_with(".Berlin_drive.graphml."));
		assert!(name.ends_with(".part"));
	}

	#[test]
	fn list_only_returns_graphs() -> io::Result<()> {
		let (_dir, tier) = new_tier();
		tier.persist(&CacheKey::derive("Hamburg", "drive"), &Blob::from("a"))?;
		tier.persist(&CacheKey::derive("Bremen", "walk"), &Blob::from("b"))?;
		write(tier.root().join("notes.txt"), b"x")?;
		write(tier.part_path(&CacheKey::derive("Kiel", "drive")), b"x")?;
		create_dir_all(tier.root().join("sub.graphml"))?;

		assert_eq!(tier.list()?, vec!["Bremen_walk.graphml", "Hamburg_drive.graphml"]);
		Ok(())
	}
}
