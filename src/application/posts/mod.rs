mod commands;
mod service;
pub mod types;


pub use commands::{InFlight, PendingCall};
pub use service::*;
pub use types::{ManagerState, Outcome, messages};
