//! Canonical cache keys for road network graphs.
//!
//! A [`CacheKey`] is derived from a place name and a network type. The same key names the file in the
//! local cache directory and the object below the remote prefix:
//!
//! ```rust
//! use roadcache_core::CacheKey;
//!
//! let key = CacheKey::derive("New York, NY", "drive");
//! assert_eq!(key.as_str(), "New_York__NY_drive.graphml");
//! assert_eq!(key.remote_key("graphs"), "graphs/New_York__NY_drive.graphml");
//! ```
//!
//! Keys are human readable and not hashed. Two different places that normalize to the same token
//! (e.g. `"Paris, TX"` and `"Paris  TX"`) share a key.

use std::{
	fmt::Display,
	path::{Path, PathBuf},
};

/// File extension of every cached graph.
pub const GRAPH_EXTENSION: &str = "graphml";

const FILLER: char = '_';

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
	/// Derives the key for `(location, resource_type)`.
	///
	/// Every whitespace character, comma and path separator of `location` becomes a single `_`.
	/// Runs are not collapsed, so `"a, b"` maps to `a__b`.
	#[must_use]
	pub fn derive(location: &str, resource_type: &str) -> CacheKey {
		let token: String = location
			.chars()
			.map(|c| {
				if c.is_whitespace() || matches!(c, ',' | '/' | '\\') {
					FILLER
				} else {
					c
				}
			})
			.collect();
		CacheKey(format!("{token}{FILLER}{resource_type}.{GRAPH_EXTENSION}"))
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Path of this key inside the cache directory `root`.
	#[must_use]
	pub fn local_path(&self, root: &Path) -> PathBuf {
		root.join(&self.0)
	}

	/// Object key of this key below `prefix`. An empty prefix yields the bare key.
	#[must_use]
	pub fn remote_key(&self, prefix: &str) -> String {
		let prefix = prefix.trim_matches('/');
		if prefix.is_empty() {
			self.0.clone()
		} else {
			format!("{prefix}/{}", self.0)
		}
	}
}

impl Display for CacheKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for CacheKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashSet;

	#[rstest]
	#[case("New York, NY", "drive", "New_York__NY_drive.graphml")]
	#[case("Berlin", "walk", "Berlin_walk.graphml")]
	#[case("Piedmont, California, USA", "bike", "Piedmont__California__USA_bike.graphml")]
	#[case("São Paulo", "drive", "São_Paulo_drive.graphml")]
	#[case("tab\tand\nnewline", "all", "tab_and_newline_all.graphml")]
	#[case("../../etc/passwd", "drive", ".._.._etc_passwd_drive.graphml")]
	#[case("C:\\temp", "drive", "C:_temp_drive.graphml")]
	fn derive(#[case] location: &str, #[case] resource_type: &str, #[case] expected: &str) {
		assert_eq!(CacheKey::derive(location, resource_type).as_str(), expected);
	}

	#[test]
	fn derive_is_deterministic() {
		let a = CacheKey::derive("Hamburg, Germany", "drive");
		let b = CacheKey::derive("Hamburg, Germany", "drive");
		assert_eq!(a, b);
		assert_eq!(a.as_str().as_bytes(), b.as_str().as_bytes());
	}

	#[test]
	fn derive_has_no_collisions_in_test_inputs() {
		let locations = ["New York, NY", "Berlin", "Berlin, Germany", "Paris", "Paris, TX", "Piedmont, CA"];
		let types = ["drive", "walk", "bike", "all"];
		let mut seen = HashSet::new();
		for location in locations {
			for resource_type in types {
				assert!(seen.insert(CacheKey::derive(location, resource_type)));
			}
		}
		assert_eq!(seen.len(), locations.len() * types.len());
	}

	#[test]
	fn local_path_stays_in_root() {
		let root = Path::new("/var/cache/roads");
		let path = CacheKey::derive("a/b", "drive").local_path(root);
		assert_eq!(path, Path::new("/var/cache/roads/a_b_drive.graphml"));
		assert_eq!(path.parent(), Some(root));
	}

	#[rstest]
	#[case("graphs", "graphs/Berlin_drive.graphml")]
	#[case("graphs/", "graphs/Berlin_drive.graphml")]
	#[case("/nested/graphs/", "nested/graphs/Berlin_drive.graphml")]
	#[case("", "Berlin_drive.graphml")]
	fn remote_key(#[case] prefix: &str, #[case] expected: &str) {
		assert_eq!(CacheKey::derive("Berlin", "drive").remote_key(prefix), expected);
	}

	#[test]
	fn display() {
		assert_eq!(CacheKey::derive("Berlin", "walk").to_string(), "Berlin_walk.graphml");
	}
}
