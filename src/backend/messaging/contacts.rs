//! Contact Request Workflow
//!
//! ```text
//! sendRequest            acceptRequest
//!   ──────▶ PENDING ───────────────────▶ (request deleted, edges U→R and R→U)
//!              │
//!              └─── rejectRequest ─────▶ (request deleted, no edges)
//! ```
//!
//! Contact edges are only ever created or removed in pairs; this service has
//! no way to touch a single directed edge.
//!
//! Users are not required to have a profile in the directory. Profiles only
//! enrich listings, and a missing one leaves the view's profile fields empty.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::backend::store::{ContactStore, StoreError, StoreResult, UserDirectory};
use crate::shared::messaging::{ContactRequest, ContactView, SendContactRequest, UserProfile};
use crate::shared::SharedError;

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error(transparent)]
    Invalid(#[from] SharedError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactStore>,
    users: Arc<dyn UserDirectory>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { contacts, users }
    }

    /// Create a pending request, or do nothing if one already exists.
    ///
    /// Returns every request the requester currently has outstanding.
    pub async fn send_request(
        &self,
        request: SendContactRequest,
    ) -> Result<Vec<ContactRequest>, ContactError> {
        request.validate()?;
        let SendContactRequest {
            requester,
            recipient,
        } = request;

        if self.contacts.contact_exists(requester, recipient).await? {
            return Err(StoreError::conflict(format!(
                "{requester} and {recipient} are already contacts"
            ))
            .into());
        }

        if self
            .contacts
            .insert_request(ContactRequest::pending(requester, recipient))
            .await?
        {
            tracing::info!("[Contacts] Request {} -> {} created", requester, recipient);
        } else {
            tracing::debug!("[Contacts] Request {} -> {} already pending", requester, recipient);
        }

        Ok(self.contacts.requests_by_requester(requester).await?)
    }

    /// `accepter` accepts the pending request sent by `requester`
    pub async fn accept_request(&self, accepter: Uuid, requester: Uuid) -> StoreResult<bool> {
        let (forward, backward) = self.contacts.accept_request(requester, accepter).await?;
        tracing::info!(
            "[Contacts] {} accepted {}; edges {} and {} created",
            accepter,
            requester,
            forward.id,
            backward.id
        );
        Ok(true)
    }

    /// `rejecter` rejects the pending request sent by `requester`
    pub async fn reject_request(&self, rejecter: Uuid, requester: Uuid) -> StoreResult<bool> {
        if !self.contacts.delete_request(requester, rejecter).await? {
            return Err(StoreError::not_found("contact request"));
        }
        tracing::info!("[Contacts] {} rejected {}", rejecter, requester);
        Ok(true)
    }

    /// Pending requests addressed to `user_id`
    pub async fn incoming_requests(&self, user_id: Uuid) -> StoreResult<Vec<ContactRequest>> {
        self.contacts.requests_by_recipient(user_id).await
    }

    pub async fn remove_contact(&self, user_id: Uuid, other_id: Uuid) -> StoreResult<()> {
        if !self.contacts.remove_contact_pair(user_id, other_id).await? {
            return Err(StoreError::not_found("contact"));
        }
        tracing::info!("[Contacts] {} and {} are no longer contacts", user_id, other_id);
        Ok(())
    }

    /// Contacts of `user_id` followed by their pending outgoing requests,
    /// each joined with the counterpart's profile.
    ///
    /// Entries are not merged: a stale pending request to an existing
    /// contact shows up twice.
    pub async fn list_contacts(&self, user_id: Uuid) -> StoreResult<Vec<ContactView>> {
        let contacts = self.contacts.contacts_of(user_id).await?;
        let pending: Vec<ContactRequest> = self
            .contacts
            .requests_by_requester(user_id)
            .await?
            .into_iter()
            .filter(ContactRequest::is_pending)
            .collect();

        let mut seen = HashSet::new();
        let counterparts: Vec<Uuid> = contacts
            .iter()
            .map(|c| c.target)
            .chain(pending.iter().map(|r| r.recipient))
            .filter(|id| seen.insert(*id))
            .collect();

        let profiles: HashMap<Uuid, UserProfile> = self
            .users
            .find_by_ids(&counterparts)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let views = contacts
            .iter()
            .map(|c| ContactView::accepted(c, profiles.get(&c.target)))
            .chain(
                pending
                    .iter()
                    .map(|r| ContactView::pending(r, profiles.get(&r.recipient))),
            )
            .collect();
        Ok(views)
    }
}
