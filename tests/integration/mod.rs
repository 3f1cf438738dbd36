//! Integration tests
//!
//! Drive the full router over the in-memory store.

mod contacts_test;
mod messages_test;
mod realtime_test;
mod users_test;
