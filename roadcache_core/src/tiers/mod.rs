//! Adapters for the two cache tiers. The third tier, the origin, is an [`crate::OriginGenerator`].

mod local;
mod probe;
mod remote;

pub use local::LocalTier;
pub use probe::Probe;
pub use remote::RemoteTier;
