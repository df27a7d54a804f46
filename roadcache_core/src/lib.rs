//! Cache keys, cache tiers and the tiered resolver.
//!
//! A road network graph is looked up in the local cache directory, then in a remote object store and is
//! finally generated by an origin. See [`TieredResolver`] for the lookup rules.

mod error;
mod events;
mod origin;
mod resolver;
mod store;
mod tiers;
mod types;

#[cfg(any(test, feature = "test"))]
pub mod testing;

pub use error::*;
pub use events::*;
pub use origin::*;
pub use resolver::*;
pub use store::*;
pub use tiers::*;
pub use types::*;
