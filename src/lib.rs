//! Library exports for ha-server, shared between the binary and tests.

pub mod config;
pub mod error;
pub mod metrics;
pub mod page;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
