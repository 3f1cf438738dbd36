//! Real-time Delivery Module
//!
//! Push-side delivery of persisted messages.
//!
//! - **`hub`** - `NotificationHub`, per-user broadcast topics
//! - **`subscription`** - Server-Sent Events stream of one user topic
//! - **`socket`** - WebSocket push channel (subscribe, unsubscribe, send)
//!
//! ```text
//! realtime/
//! ├── mod.rs
//! ├── hub.rs
//! ├── subscription.rs
//! └── socket.rs
//! ```

pub mod hub;
pub mod socket;
pub mod subscription;

pub use hub::{NotificationHub, Notifier, TopicPayload};
pub use socket::{handle_push_socket, PushSession};
pub use subscription::handle_topic_subscription;
