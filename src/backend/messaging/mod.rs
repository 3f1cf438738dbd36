//! Messaging Module
//!
//! Message delivery and the contact-request handshake.
//!
//! - **`service`** - persist-then-publish message sending and reads
//! - **`long_poll`** - bounded wait for new messages without a push connection
//! - **`contacts`** - contact request workflow and enriched listings
//! - **`users`** - registration and lookup against the user directory
//! - **`handlers`** / **`contact_handlers`** / **`user_handlers`** - HTTP handlers

pub mod contact_handlers;
pub mod contacts;
pub mod handlers;
pub mod long_poll;
pub mod service;
pub mod user_handlers;
pub mod users;

pub use contacts::{ContactError, ContactService};
pub use long_poll::{LongPollCoordinator, PersistSignal, PollOutcome, PollSettings};
pub use service::{MessageService, SendError};
pub use users::{UserError, UserService};
