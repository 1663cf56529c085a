pub mod protocol;
pub mod snapshot;
pub mod summary;
