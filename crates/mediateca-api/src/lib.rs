//! Mediateca HTTP API
//!
//! Thin axum handlers over the upload repositories; modules are public so
//! integration tests can build the router the same way `main` does.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
