pub mod posts;
pub mod views;
