//! Chatline - Main Library
//!
//! Direct messages between users, delivered in near real time over two
//! paths, plus a contact-request handshake that turns a one-sided request
//! into a mutual contact.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by every layer and by clients
//!   - Messages, contact requests, contacts and their listing view
//!   - Push channel frames
//!   - Validation errors
//!
//! - **`backend`** - The Axum server
//!   - Store contracts (in-memory and PostgreSQL)
//!   - Persist-then-publish delivery, long polling, contact workflow
//!   - SSE and WebSocket push
//!
//! # Usage
//!
//! ```rust,no_run
//! use chatline::backend::server::{build_state, create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load()?;
//! let state = build_state(&config).await;
//! let app = create_app(state, &config);
//! let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Delivery Guarantees
//!
//! - Every message is persisted exactly once before anyone is notified
//! - Notification is best-effort and at-least-once to both participants
//! - A long poll observes any message persisted during its wait

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
