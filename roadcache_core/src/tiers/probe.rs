use crate::StoreError;

/// Outcome of asking one tier for a key.
#[derive(Debug)]
pub enum Probe<T> {
	/// The tier has the key.
	Found(T),
	/// The tier confirmed that it does not have the key.
	NotFound,
	/// The tier could not be asked.
	Failed(StoreError),
}

impl<T> Probe<T> {
	/// Converts the answer of an existence check.
	pub fn from_exists(result: Result<bool, StoreError>, found: T) -> Self {
		match result {
			Ok(true) => Probe::Found(found),
			Ok(false) => Probe::NotFound,
			Err(err) if err.is_not_found() => Probe::NotFound,
			Err(err) => Probe::Failed(err),
		}
	}

	pub fn is_found(&self) -> bool {
		matches!(self, Probe::Found(_))
	}
}
