pub mod error;
pub mod posts;
