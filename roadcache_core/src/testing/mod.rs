//! Mock tiers for testing the resolver and code built on top of it.
//!
//! Both mocks count their calls and can be told to fail, so tests can assert exactly which tiers a
//! resolve touched.

mod mock_origin;
mod mock_store;

pub use mock_origin::MockOrigin;
pub use mock_store::{MockFailure, MockObjectStore, StoreCalls};
