use crate::{Blob, ObjectStore, StoreError};
use async_trait::async_trait;
use std::{
	collections::BTreeMap,
	path::Path,
	sync::{Mutex, MutexGuard},
};

/// Number of calls per [`ObjectStore`] method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreCalls {
	pub exists: usize,
	pub upload: usize,
	pub download: usize,
	pub list: usize,
}

/// Failure a [`MockObjectStore`] method can be told to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockFailure {
	Transport,
	Status(u16),
	NotFound,
}

impl MockFailure {
	fn to_error(self, key: &str) -> StoreError {
		match self {
			MockFailure::Transport => StoreError::Transport(format!("mock transport failure for '{key}'")),
			MockFailure::Status(status) => StoreError::Status {
				status,
				message: format!("mock status for '{key}'"),
			},
			MockFailure::NotFound => StoreError::NotFound { key: key.to_string() },
		}
	}
}

#[derive(Default)]
struct State {
	objects: BTreeMap<(String, String), Vec<u8>>,
	calls: StoreCalls,
	fail_exists: Option<MockFailure>,
	fail_upload: Option<MockFailure>,
	fail_download: Option<MockFailure>,
}

/// An in-memory object store.
#[derive(Default)]
pub struct MockObjectStore {
	state: Mutex<State>,
}

impl MockObjectStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn state(&self) -> MutexGuard<'_, State> {
		self.state.lock().expect("mock store lock poisoned")
	}

	pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Blob>) {
		let data: Blob = data.into();
		self
			.state()
			.objects
			.insert((bucket.to_string(), key.to_string()), data.into_vec());
	}

	pub fn get(&self, bucket: &str, key: &str) -> Option<Blob> {
		self
			.state()
			.objects
			.get(&(bucket.to_string(), key.to_string()))
			.map(|data| Blob::from(data.as_slice()))
	}

	pub fn len(&self) -> usize {
		self.state().objects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn calls(&self) -> StoreCalls {
		self.state().calls
	}

	pub fn fail_exists(&self, failure: MockFailure) {
		self.state().fail_exists = Some(failure);
	}

	pub fn fail_upload(&self, failure: MockFailure) {
		self.state().fail_upload = Some(failure);
	}

	pub fn fail_download(&self, failure: MockFailure) {
		self.state().fail_download = Some(failure);
	}
}

impl std::fmt::Debug for MockObjectStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state();
		f.debug_struct("MockObjectStore")
			.field("objects", &state.objects.len())
			.field("calls", &state.calls)
			.finish()
	}
}

#[async_trait]
impl ObjectStore for MockObjectStore {
	async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StoreError> {
		let mut state = self.state();
		state.calls.exists += 1;
		if let Some(failure) = state.fail_exists {
			return Err(failure.to_error(key));
		}
		Ok(state.objects.contains_key(&(bucket.to_string(), key.to_string())))
	}

	async fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError> {
		let mut state = self.state();
		state.calls.upload += 1;
		if let Some(failure) = state.fail_upload {
			return Err(failure.to_error(key));
		}
		let data = std::fs::read(local_path)?;
		state.objects.insert((bucket.to_string(), key.to_string()), data);
		Ok(())
	}

	async fn download(&self, bucket: &str, key: &str, local_path: &Path) -> Result<(), StoreError> {
		let mut state = self.state();
		state.calls.download += 1;
		if let Some(failure) = state.fail_download {
			return Err(failure.to_error(key));
		}
		let data = state
			.objects
			.get(&(bucket.to_string(), key.to_string()))
			.ok_or_else(|| StoreError::NotFound { key: key.to_string() })?;
		std::fs::write(local_path, data)?;
		Ok(())
	}

	async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
		let mut state = self.state();
		state.calls.list += 1;
		Ok(state
			.objects
			.keys()
			.filter(|(b, k)| b == bucket && k.starts_with(prefix))
			.map(|(_, k)| k.clone())
			.collect())
	}

	fn name(&self) -> &str {
		"mock"
	}
}
