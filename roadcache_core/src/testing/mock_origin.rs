use crate::{Blob, OriginGenerator};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;

/// An origin that produces a small deterministic document per request, or fails.
#[derive(Debug, Default)]
pub struct MockOrigin {
	failure: Option<String>,
	requests: Mutex<Vec<(String, String)>>,
}

impl MockOrigin {
	pub fn new() -> Self {
		Self::default()
	}

	/// An origin whose every call fails with `message`.
	pub fn failing(message: &str) -> Self {
		Self {
			failure: Some(message.to_string()),
			..Self::default()
		}
	}

	/// The document produced for a request.
	pub fn document(location: &str, resource_type: &str) -> Blob {
		Blob::from(format!(
			"<graphml><graph id=\"{location}\" type=\"{resource_type}\"><node id=\"1\"/><node id=\"2\"/><edge source=\"1\" target=\"2\"/></graph></graphml>"
		))
	}

	pub fn calls(&self) -> usize {
		self.requests.lock().expect("mock origin lock poisoned").len()
	}

	pub fn requests(&self) -> Vec<(String, String)> {
		self.requests.lock().expect("mock origin lock poisoned").clone()
	}
}

#[async_trait]
impl OriginGenerator for MockOrigin {
	async fn generate(&self, location: &str, resource_type: &str) -> Result<Blob> {
		self
			.requests
			.lock()
			.expect("mock origin lock poisoned")
			.push((location.to_string(), resource_type.to_string()));
		if let Some(message) = &self.failure {
			bail!("{message}");
		}
		Ok(Self::document(location, resource_type))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn records_requests() {
		let origin = MockOrigin::new();
		let blob = origin.generate("Berlin", "drive").await.unwrap();
		assert_eq!(blob, MockOrigin::document("Berlin", "drive"));
		assert_eq!(origin.requests(), vec![("Berlin".to_string(), "drive".to_string())]);
	}

	#[tokio::test]
	async fn failing_still_counts() {
		let origin = MockOrigin::failing("overpass down");
		let err = origin.generate("Berlin", "drive").await.unwrap_err();
		assert_eq!(err.to_string(), "overpass down");
		assert_eq!(origin.calls(), 1);
	}
}
