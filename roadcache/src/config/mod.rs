//! Configuration of a roadcache run.
//!
//! - [`Config`]: the requested graph, the cache directory and the remote namespace
//! - [`RemoteConfig`]: endpoint and credentials of the remote store
//! - [`OriginConfig`]: the OpenStreetMap services used to generate graphs
//! - [`ResolverConfig`]: behaviour of the tiered lookup
//!
//! Configurations are YAML documents. JSON is valid YAML, so the JSON files of older setups
//! (`{"s3_bucket": ..., "location": ..., "network_type": ...}`) load unchanged.

mod main;
mod origin;
mod resolver;

pub use main::Config;
pub use origin::OriginConfig;
pub use resolver::ResolverConfig;
pub use roadcache_store::RemoteConfig;
