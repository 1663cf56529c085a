pub mod config;
pub mod decode;
pub mod error;
pub mod session;
