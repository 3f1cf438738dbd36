//! Messaging Module
//!
//! This module contains all the data structures for direct messaging and the
//! contact handshake:
//!
//! - `Message` - A direct message between two users
//! - `ContactRequest` - A pending request from one user to another
//! - `Contact` - One directed edge of a mutual contact relationship
//! - `ContactView` - A contact or pending request joined with a user profile
//! - `UserProfile` - The profile fields looked up for contact listings
//! - `ClientFrame` / `ServerFrame` - Push channel frames
//!
//! # Usage
//!
//! ```rust
//! use chatline::shared::messaging::{Contact, ContactRequest, Message};
//! ```

pub mod contact;
pub mod contact_request;
pub mod message;
pub mod push;
pub mod user;

// Re-export all types
pub use contact::{Contact, ContactView};
pub use contact_request::{ContactRequest, ContactRequestStatus, SendContactRequest};
pub use message::{ConversationParams, Message, PollParams, SendMessageRequest};
pub use push::{ClientFrame, ServerFrame};
pub use user::{CreateUserRequest, UserProfile};
