//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their HTTP conversion.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! ├── conversion.rs - IntoResponse implementation
//! └── rejection.rs  - Extractors whose rejections are `BackendError`s
//! ```
//!
//! Store errors convert into `BackendError` with `?`, so handlers never match
//! on them directly.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub mod rejection;

pub use rejection::{ApiJson, ApiPath, ApiQuery};
pub use types::BackendError;
