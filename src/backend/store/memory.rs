//! In-memory store
//!
//! Backs all three store contracts with one `Arc<RwLock<MemoryState>>`.
//! Every compound operation (request acceptance, pair removal) runs under a
//! single write guard, which gives it the same all-or-nothing behaviour the
//! PostgreSQL store gets from a transaction. Message timestamps are taken
//! under the same guard as the insert.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, MessageStore, NewMessage, StoreError, StoreResult, UserDirectory};
use crate::shared::messaging::{Contact, ContactRequest, Message, UserProfile};

#[derive(Default)]
struct MemoryState {
    /// Insertion order is the tie-breaker for equal timestamps
    messages: Vec<Message>,
    last_stamp: i64,
    requests: Vec<ContactRequest>,
    contacts: Vec<Contact>,
    next_contact_id: i64,
    users: Vec<UserProfile>,
}

impl MemoryState {
    /// `max(wall clock, last + 1)`
    fn next_stamp(&mut self) -> i64 {
        let next = Utc::now().timestamp_millis().max(self.last_stamp + 1);
        self.last_stamp = next;
        next
    }

    fn find_edge(&self, initiator: Uuid, target: Uuid) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.initiator == initiator && c.target == target)
    }

    /// Returns the existing edge if present, so a retried acceptance stays
    /// symmetric without duplicating rows.
    fn upsert_edge(&mut self, initiator: Uuid, target: Uuid) -> Contact {
        if let Some(existing) = self.find_edge(initiator, target) {
            return existing.clone();
        }
        self.next_contact_id += 1;
        let contact = Contact {
            id: self.next_contact_id,
            initiator,
            target,
            created_at: Utc::now(),
        };
        self.contacts.push(contact.clone());
        contact
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_time(mut messages: Vec<Message>) -> Vec<Message> {
    // stable sort keeps insertion order for equal timestamps
    messages.sort_by_key(|m| m.created_at);
    messages
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(&self, message: NewMessage) -> StoreResult<Message> {
        let mut state = self.state.write().await;
        if state.messages.iter().any(|m| m.id == message.id) {
            return Err(StoreError::conflict(format!(
                "message {} already exists",
                message.id
            )));
        }
        let created_at = state.next_stamp();
        let message = message.stamped(created_at);
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let state = self.state.read().await;
        Ok(state.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn conversation(
        &self,
        user1: Uuid,
        user2: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Message>> {
        let state = self.state.read().await;
        let messages = state
            .messages
            .iter()
            .filter(|m| m.is_between(user1, user2))
            .filter(|m| include_deleted || !m.is_deleted)
            .cloned()
            .collect();
        Ok(sorted_by_time(messages))
    }

    async fn messages_since(
        &self,
        user1: Uuid,
        user2: Uuid,
        since: i64,
    ) -> StoreResult<Vec<Message>> {
        let state = self.state.read().await;
        let messages = state
            .messages
            .iter()
            .filter(|m| m.is_between(user1, user2) && !m.is_deleted && m.created_at > since)
            .cloned()
            .collect();
        Ok(sorted_by_time(messages))
    }

    async fn by_sender(&self, sender: Uuid) -> StoreResult<Vec<Message>> {
        let state = self.state.read().await;
        let messages = state
            .messages
            .iter()
            .filter(|m| m.sender == sender)
            .cloned()
            .collect();
        Ok(sorted_by_time(messages))
    }

    async fn by_receiver(&self, receiver: Uuid) -> StoreResult<Vec<Message>> {
        let state = self.state.read().await;
        let messages = state
            .messages
            .iter()
            .filter(|m| m.receiver == receiver)
            .cloned()
            .collect();
        Ok(sorted_by_time(messages))
    }

    async fn soft_delete(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let mut state = self.state.write().await;
        Ok(state.messages.iter_mut().find(|m| m.id == id).map(|m| {
            m.is_deleted = true;
            m.clone()
        }))
    }

    async fn purge(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.messages.len();
        state.messages.retain(|m| m.id != id);
        Ok(state.messages.len() != before)
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn insert_request(&self, request: ContactRequest) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .requests
            .iter()
            .any(|r| r.requester == request.requester && r.recipient == request.recipient);
        if exists {
            return Ok(false);
        }
        state.requests.push(request);
        Ok(true)
    }

    async fn requests_by_requester(&self, requester: Uuid) -> StoreResult<Vec<ContactRequest>> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .iter()
            .filter(|r| r.requester == requester)
            .cloned()
            .collect())
    }

    async fn requests_by_recipient(&self, recipient: Uuid) -> StoreResult<Vec<ContactRequest>> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .iter()
            .filter(|r| r.recipient == recipient && r.is_pending())
            .cloned()
            .collect())
    }

    async fn accept_request(
        &self,
        requester: Uuid,
        recipient: Uuid,
    ) -> StoreResult<(Contact, Contact)> {
        let mut state = self.state.write().await;
        let position = state
            .requests
            .iter()
            .position(|r| r.requester == requester && r.recipient == recipient && r.is_pending())
            .ok_or(StoreError::not_found("contact request"))?;

        state.requests.remove(position);
        let forward = state.upsert_edge(recipient, requester);
        let backward = state.upsert_edge(requester, recipient);
        Ok((forward, backward))
    }

    async fn delete_request(&self, requester: Uuid, recipient: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.requests.len();
        state
            .requests
            .retain(|r| !(r.requester == requester && r.recipient == recipient && r.is_pending()));
        Ok(state.requests.len() != before)
    }

    async fn contacts_of(&self, initiator: Uuid) -> StoreResult<Vec<Contact>> {
        let state = self.state.read().await;
        Ok(state
            .contacts
            .iter()
            .filter(|c| c.initiator == initiator)
            .cloned()
            .collect())
    }

    async fn contact_exists(&self, initiator: Uuid, target: Uuid) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state.find_edge(initiator, target).is_some())
    }

    async fn remove_contact_pair(&self, user1: Uuid, user2: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.contacts.len();
        state.contacts.retain(|c| {
            !((c.initiator == user1 && c.target == user2)
                || (c.initiator == user2 && c.target == user1))
        });
        Ok(state.contacts.len() != before)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<UserProfile>> {
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|u| wanted.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn register(&self, profile: UserProfile) -> StoreResult<UserProfile> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.users.iter().find(|u| {
            u.id == profile.id || u.username == profile.username || u.email == profile.email
        }) {
            return Err(StoreError::conflict(format!(
                "user {} already registered",
                existing.username
            )));
        }
        state.users.push(profile.clone());
        Ok(profile)
    }
}
