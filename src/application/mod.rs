pub mod error;
pub mod loader;
pub mod notify;
pub mod posts;
pub mod repos;
pub mod stream;
