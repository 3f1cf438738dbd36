//! Routes Module
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports
//! ├── router.rs     - Main router, tracing layer and fallback
//! └── api_routes.rs - /api route table
//! ```

/// Main router creation
pub mod router;

/// API route configuration
pub mod api_routes;

pub use router::create_router;
