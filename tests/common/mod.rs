//! Common test utilities and helpers
//!
//! - In-memory application fixtures
//! - HTTP request helpers driving the router with `oneshot`
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;
pub mod http;

pub use fixtures::*;
pub use http::*;
