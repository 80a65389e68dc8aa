// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod env_value;
pub mod logging;
pub mod server;

pub use logging::*;
pub use server::*;
