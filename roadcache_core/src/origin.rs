//! The origin is the authoritative source of a graph. It is only asked when no cache tier has it.

use crate::Blob;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

#[async_trait]
pub trait OriginGenerator: Debug + Send + Sync {
	/// Produces the serialized graph for `location` and `resource_type`.
	async fn generate(&self, location: &str, resource_type: &str) -> Result<Blob>;
}
