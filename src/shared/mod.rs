//! Shared Module
//!
//! This module contains the types that cross layer boundaries: the domain
//! records persisted by the stores, the request/response bodies of the HTTP
//! surface, and the frames exchanged over the push channel.
//!
//! # Overview
//!
//! Nothing in here performs I/O. Every type is `Serialize`/`Deserialize` so it
//! can travel over HTTP, Server-Sent Events or a WebSocket unchanged.

/// Shared error types
pub mod error;

/// Messaging domain types (messages, contacts, contact requests, users)
pub mod messaging;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use messaging::{
    ClientFrame, Contact, ContactRequest, ContactRequestStatus, ContactView, CreateUserRequest,
    Message, SendContactRequest, SendMessageRequest, ServerFrame, UserProfile,
};
