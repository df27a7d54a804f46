//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] holding a resource payload.
//!
//! # Overview
//!
//! The resolver never looks inside a cached resource. A [`Blob`] is what every tier hands back: the bytes
//! read from the local cache, the bytes of a downloaded object or the bytes produced by the origin.
//!
//! # Examples
//!
//! ```rust
//! use roadcache_core::Blob;
//!
//! let blob = Blob::from("<graphml/>");
//! assert_eq!(blob.len(), 10);
//! assert_eq!(blob.as_str(), Some("<graphml/>"));
//! ```

use std::{fmt::Debug, io, path::Path};

/// A simple wrapper around [`Vec<u8>`] with a few helpers for cached payloads.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Returns a reference to the underlying byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	/// Returns the content as `&str` if it is valid UTF-8.
	///
	/// ```rust
	/// use roadcache_core::Blob;
	///
	/// assert_eq!(Blob::from(&[0xff, 0xfe]).as_str(), None);
	/// ```
	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		std::str::from_utf8(&self.0).ok()
	}

	/// Consumes this [`Blob`] and returns the underlying `Vec<u8>`.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the length in bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Reads a whole file into a [`Blob`].
	pub fn load_from_file(path: &Path) -> io::Result<Self> {
		Ok(Blob::from(std::fs::read(path)?))
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

/// Prints the byte length and at most the first 32 bytes in hex, cached graphs are large.
impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let preview = self
			.0
			.iter()
			.take(32)
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ");
		if self.0.len() > 32 {
			write!(f, "Blob({}): {preview} ...", self.0.len())
		} else {
			write!(f, "Blob({}): {preview}", self.0.len())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::NamedTempFile;

	#[test]
	fn conversions() {
		assert_eq!(Blob::from(vec![1, 2, 3]).into_vec(), vec![1, 2, 3]);
		assert_eq!(Blob::from(&[4u8, 5]).as_slice(), &[4, 5]);
		assert_eq!(Blob::from(String::from("abc")).as_str(), Some("abc"));
		assert!(Blob::default().is_empty());
	}

	#[test]
	fn debug_is_truncated() {
		assert_eq!(format!("{:?}", Blob::from(&[0xde, 0xad])), "Blob(2): de ad");
		let long = format!("{:?}", Blob::from(vec![0u8; 100]));
		assert!(long.starts_with("Blob(100): 00 00"));
		assert!(long.ends_with(" ..."));
	}

	#[test]
	fn load_from_file() -> Result<(), Box<dyn std::error::Error>> {
		let file = NamedTempFile::new("blob.graphml")?;
		std::fs::write(file.path(), b"<graphml/>")?;
		assert_eq!(Blob::load_from_file(file.path())?.as_str(), Some("<graphml/>"));
		assert!(Blob::load_from_file(&file.path().with_extension("missing")).is_err());
		Ok(())
	}
}
