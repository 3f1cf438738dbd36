//! Server Module
//!
//! Everything needed to turn configuration into a running router.
//!
//! ```text
//! server/
//! ├── mod.rs      - Module exports and documentation
//! ├── config.rs   - Layered configuration and database loading
//! ├── state.rs    - AppState and FromRef implementations
//! ├── init.rs     - State construction, app creation, background tasks
//! └── shutdown.rs - Process-wide shutdown signal
//! ```

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

/// Shutdown signal
pub mod shutdown;

/// Application state management
pub mod state;

pub use config::{load_database, ConfigError, ServerConfig, ServerConfigBuilder};
pub use init::{build_state, create_app, spawn_topic_cleanup};
pub use shutdown::Shutdown;
pub use state::AppState;
