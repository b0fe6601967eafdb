//! Simulation service client and types.
//!
//! This module provides the interface for communicating with the simulation
//! backend over HTTP.

mod client;
pub mod error;
pub mod types;

pub use client::{SimClient, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
