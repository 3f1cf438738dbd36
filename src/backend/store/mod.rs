//! Store Module
//!
//! Read/write contracts the messaging core needs from durable storage, plus
//! two implementations:
//!
//! - **`memory`** - process-local store, used when no database is configured
//!   and by the test suite
//! - **`postgres`** - PostgreSQL store built on `sqlx`
//!
//! # Contact symmetry
//!
//! `ContactStore` deliberately has no operation that inserts or removes a
//! single directed edge. Edges are only created by `accept_request` and only
//! removed by `remove_contact_pair`, both of which act on the pair as one unit.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::messaging::{Contact, ContactRequest, Message, UserProfile};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors returned by every store operation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The backing store is unavailable or returned an unexpected error
    #[error("store failure: {0}")]
    Failure(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::conflict(db.message().to_string())
            }
            sqlx::Error::RowNotFound => Self::not_found("row"),
            _ => Self::Failure(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A message as submitted, before the store stamps its creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub id: Uuid,
    pub sender: Uuid,
    pub receiver: Uuid,
    pub text: String,
}

impl NewMessage {
    pub fn new(sender: Uuid, receiver: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            receiver,
            text: text.into(),
        }
    }

    pub(crate) fn stamped(self, created_at: i64) -> Message {
        Message {
            id: self.id,
            sender: self.sender,
            receiver: self.receiver,
            text: self.text,
            created_at,
            is_deleted: false,
        }
    }
}

/// Durable, queryable message log
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new message. Fails with `Conflict` if the id is taken.
    ///
    /// `created_at` is assigned inside the write that persists the row:
    /// epoch milliseconds, never behind the wall clock and strictly greater
    /// than every timestamp already stored. Stamp order therefore equals
    /// commit order, so an exclusive `since` watermark taken from any
    /// returned message cannot pass over one that commits later.
    async fn append(&self, message: NewMessage) -> StoreResult<Message>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Message>>;

    /// Messages between the two users in either direction, ascending by
    /// `created_at` with ties in insertion order.
    async fn conversation(
        &self,
        user1: Uuid,
        user2: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Message>>;

    /// Non-deleted messages of the conversation with `created_at > since`,
    /// in conversation order.
    async fn messages_since(&self, user1: Uuid, user2: Uuid, since: i64)
        -> StoreResult<Vec<Message>>;

    async fn by_sender(&self, sender: Uuid) -> StoreResult<Vec<Message>>;

    async fn by_receiver(&self, receiver: Uuid) -> StoreResult<Vec<Message>>;

    /// Flip the soft-delete flag; `None` if the message does not exist.
    async fn soft_delete(&self, id: Uuid) -> StoreResult<Option<Message>>;

    /// Remove the row permanently; `false` if it did not exist.
    async fn purge(&self, id: Uuid) -> StoreResult<bool>;
}

/// Durable set of contact edges and pending contact requests
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert a pending request. Returns `false` without writing when a
    /// request with the same `(requester, recipient)` already exists.
    async fn insert_request(&self, request: ContactRequest) -> StoreResult<bool>;

    /// Requests sent by `requester`, in insertion order.
    async fn requests_by_requester(&self, requester: Uuid) -> StoreResult<Vec<ContactRequest>>;

    /// Pending requests addressed to `recipient`, in insertion order.
    async fn requests_by_recipient(&self, recipient: Uuid) -> StoreResult<Vec<ContactRequest>>;

    /// Delete the pending `(requester, recipient)` request and create the
    /// edges `recipient -> requester` and `requester -> recipient` as one
    /// unit. Fails with `NotFound` and writes nothing when no such pending
    /// request exists. Returns `(recipient -> requester, requester -> recipient)`.
    async fn accept_request(
        &self,
        requester: Uuid,
        recipient: Uuid,
    ) -> StoreResult<(Contact, Contact)>;

    /// Delete a pending request without creating edges.
    async fn delete_request(&self, requester: Uuid, recipient: Uuid) -> StoreResult<bool>;

    /// Edges initiated by `initiator`, in insertion order.
    async fn contacts_of(&self, initiator: Uuid) -> StoreResult<Vec<Contact>>;

    async fn contact_exists(&self, initiator: Uuid, target: Uuid) -> StoreResult<bool>;

    /// Remove both directed edges between `user1` and `user2` as one unit.
    async fn remove_contact_pair(&self, user1: Uuid, user2: Uuid) -> StoreResult<bool>;
}

/// Lookup contract for the external user service
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Batched lookup; ids with no profile are simply absent from the result.
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<UserProfile>>;

    /// Register a profile. Fails with `Conflict` on a duplicate id, username
    /// or email.
    async fn register(&self, profile: UserProfile) -> StoreResult<UserProfile>;
}

/// The set of stores the application is wired with
#[derive(Clone)]
pub struct Stores {
    pub messages: Arc<dyn MessageStore>,
    pub contacts: Arc<dyn ContactStore>,
    pub users: Arc<dyn UserDirectory>,
}

impl Stores {
    /// All three contracts backed by one shared in-memory store
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            messages: Arc::new(store.clone()),
            contacts: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }

    /// All three contracts backed by PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        let store = PgStore::new(pool);
        Self {
            messages: Arc::new(store.clone()),
            contacts: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }
}
