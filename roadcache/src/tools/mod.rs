pub mod key;
pub mod list;
pub mod load;
