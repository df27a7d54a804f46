mod blob;
mod cache_key;
mod remote_namespace;
mod resource_request;
mod tier;

pub use blob::*;
pub use cache_key::*;
pub use remote_namespace::*;
pub use resource_request::*;
pub use tier::*;
