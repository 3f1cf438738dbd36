//! Backend Module
//!
//! Server-side code for the Chatline direct-messaging service.
//!
//! # Architecture
//!
//! - **`store`** - durable-store contracts with in-memory and PostgreSQL implementations
//! - **`messaging`** - message service, long poll, contact workflow, HTTP handlers
//! - **`realtime`** - notification hub, SSE topic stream, WebSocket push channel
//! - **`server`** - configuration, application state, initialization, shutdown
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`error`** - backend error type and its HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs      - Module exports and documentation
//! ├── store/      - Store traits and implementations
//! ├── messaging/  - Delivery and contact workflow
//! ├── realtime/   - Push delivery
//! ├── server/     - Server initialization and state
//! ├── routes/     - Route configuration
//! └── error/      - Error types
//! ```
//!
//! # Delivery Paths
//!
//! A message sent over HTTP or the push channel is persisted first, then
//! published to the sender's and receiver's topics. Clients without a live
//! subscription long-poll instead; waiting polls are woken by the same
//! persist step.
//!
//! # State Management
//!
//! `AppState` holds the services and the hub; every part is `Clone` and is
//! extracted by handlers through `FromRef`. The stores are the only mutable
//! shared resources.

/// Backend error types
pub mod error;

/// Messaging and contact system
pub mod messaging;

/// Push delivery
pub mod realtime;

/// Route configuration
pub mod routes;

/// Server setup and configuration
pub mod server;

/// Durable store contracts
pub mod store;

pub use error::BackendError;
pub use server::{build_state, create_app, AppState, ServerConfig};
