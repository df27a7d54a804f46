//! # roadcache
//!
//! Loads road network graphs through three tiers of ascending cost:
//!
//! 1. a local cache directory,
//! 2. a shared object store (S3 or a directory),
//! 3. OpenStreetMap, queried through Nominatim and Overpass.
//!
//! A graph found in a slower tier is written back to the faster ones, so every tier only pays for a graph
//! once.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use roadcache::{config::Config, loader::GraphLoader};
//! use roadcache_core::EventBus;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_string("location: Piedmont, California, USA")?;
//!     let loader = GraphLoader::new(config, EventBus::new())?;
//!
//!     let graph = loader.load().await?;
//!     println!("{} from {}", graph.summary, graph.resolved.tier);
//!     Ok(())
//! }
//! ```

pub mod config;
mod graph_summary;
pub mod loader;
pub mod origin;

pub use graph_summary::GraphSummary;
pub use roadcache_core as core;
pub use roadcache_store as store;
