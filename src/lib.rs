//! simdash - a terminal front end for the portfolio simulation service.
//!
//! The binary wires these modules together; they are public so the
//! integration tests can drive the app without a terminal.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod logging;
pub mod tasks;
pub mod ui;
