//! PostgreSQL store
//!
//! Runtime-checked `sqlx` queries against the schema in `migrations/`.
//! Conversation order is `created_at` then the `seq` insertion counter.
//!
//! Message timestamps are computed by the insert itself while the
//! `messages` table is locked against concurrent writers, so the stamp is
//! above every committed row even when several servers share the database.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::{
    ContactStore, MessageStore, NewMessage, StoreError, StoreResult, UserDirectory,
};
use crate::shared::messaging::{
    Contact, ContactRequest, ContactRequestStatus, Message, UserProfile,
};

const MESSAGE_COLUMNS: &str = "id, sender, receiver, text, created_at, is_deleted";
const REQUEST_COLUMNS: &str = "requester, recipient, status, created_at, updated_at";
const CONTACT_COLUMNS: &str = "id, initiator, target, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &PgRow) -> Result<Message, sqlx::Error> {
    Ok(Message {
        id: row.try_get("id")?,
        sender: row.try_get("sender")?,
        receiver: row.try_get("receiver")?,
        text: row.try_get("text")?,
        created_at: row.try_get("created_at")?,
        is_deleted: row.try_get("is_deleted")?,
    })
}

fn status_from_column(status: &str) -> Result<ContactRequestStatus, sqlx::Error> {
    ContactRequestStatus::from_str(status).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: format!("unknown contact request status {status:?}").into(),
    })
}

fn request_from_row(row: &PgRow) -> Result<ContactRequest, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status_from_column(&status)?;
    Ok(ContactRequest {
        requester: row.try_get("requester")?,
        recipient: row.try_get("recipient")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn contact_from_row(row: &PgRow) -> Result<Contact, sqlx::Error> {
    Ok(Contact {
        id: row.try_get("id")?,
        initiator: row.try_get("initiator")?,
        target: row.try_get("target")?,
        created_at: row.try_get("created_at")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<UserProfile, sqlx::Error> {
    Ok(UserProfile {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        photo_uri: row.try_get("photo_uri")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}

fn collect<T>(
    rows: Vec<PgRow>,
    map: fn(&PgRow) -> Result<T, sqlx::Error>,
) -> StoreResult<Vec<T>> {
    rows.iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::from)
}

/// Insert one directed edge, or return the existing one
async fn upsert_edge(
    tx: &mut Transaction<'_, Postgres>,
    initiator: Uuid,
    target: Uuid,
) -> StoreResult<Contact> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO contacts (initiator, target, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (initiator, target) DO UPDATE SET initiator = EXCLUDED.initiator
        RETURNING {CONTACT_COLUMNS}
        "#
    ))
    .bind(initiator)
    .bind(target)
    .fetch_one(&mut **tx)
    .await?;

    Ok(contact_from_row(&row)?)
}

#[async_trait]
impl MessageStore for PgStore {
    async fn append(&self, message: NewMessage) -> StoreResult<Message> {
        let mut tx = self.pool.begin().await?;

        // Blocks other appends until commit; readers are unaffected
        sqlx::query("LOCK TABLE messages IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO messages (id, sender, receiver, text, created_at, is_deleted)
            SELECT $1::UUID, $2::UUID, $3::UUID, $4::TEXT,
                   GREATEST($5::BIGINT, COALESCE(MAX(created_at), 0) + 1), FALSE
            FROM messages
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(message.id)
        .bind(message.sender)
        .bind(message.receiver)
        .bind(&message.text)
        .bind(Utc::now().timestamp_millis())
        .fetch_one(&mut *tx)
        .await?;
        let saved = message_from_row(&row)?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let row = sqlx::query(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(message_from_row).transpose()?)
    }

    async fn conversation(
        &self,
        user1: Uuid,
        user2: Uuid,
        include_deleted: bool,
    ) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE ((sender = $1 AND receiver = $2) OR (sender = $2 AND receiver = $1))
              AND ($3 OR NOT is_deleted)
            ORDER BY created_at, seq
            "#
        ))
        .bind(user1)
        .bind(user2)
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, message_from_row)
    }

    async fn messages_since(
        &self,
        user1: Uuid,
        user2: Uuid,
        since: i64,
    ) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE ((sender = $1 AND receiver = $2) OR (sender = $2 AND receiver = $1))
              AND NOT is_deleted
              AND created_at > $3
            ORDER BY created_at, seq
            "#
        ))
        .bind(user1)
        .bind(user2)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, message_from_row)
    }

    async fn by_sender(&self, sender: Uuid) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE sender = $1 ORDER BY created_at, seq"
        ))
        .bind(sender)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, message_from_row)
    }

    async fn by_receiver(&self, receiver: Uuid) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE receiver = $1 ORDER BY created_at, seq"
        ))
        .bind(receiver)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, message_from_row)
    }

    async fn soft_delete(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let row = sqlx::query(&format!(
            "UPDATE messages SET is_deleted = TRUE WHERE id = $1 RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(message_from_row).transpose()?)
    }

    async fn purge(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn insert_request(&self, request: ContactRequest) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO contact_requests (requester, recipient, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (requester, recipient) DO NOTHING
            "#,
        )
        .bind(request.requester)
        .bind(request.recipient)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn requests_by_requester(&self, requester: Uuid) -> StoreResult<Vec<ContactRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM contact_requests WHERE requester = $1 ORDER BY seq"
        ))
        .bind(requester)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, request_from_row)
    }

    async fn requests_by_recipient(&self, recipient: Uuid) -> StoreResult<Vec<ContactRequest>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {REQUEST_COLUMNS} FROM contact_requests
            WHERE recipient = $1 AND status = 'PENDING'
            ORDER BY seq
            "#
        ))
        .bind(recipient)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, request_from_row)
    }

    async fn accept_request(
        &self,
        requester: Uuid,
        recipient: Uuid,
    ) -> StoreResult<(Contact, Contact)> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM contact_requests
            WHERE requester = $1 AND recipient = $2 AND status = 'PENDING'
            "#,
        )
        .bind(requester)
        .bind(recipient)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            // dropping the transaction rolls it back
            return Err(StoreError::not_found("contact request"));
        }

        let forward = upsert_edge(&mut tx, recipient, requester).await?;
        let backward = upsert_edge(&mut tx, requester, recipient).await?;
        tx.commit().await?;

        Ok((forward, backward))
    }

    async fn delete_request(&self, requester: Uuid, recipient: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM contact_requests
            WHERE requester = $1 AND recipient = $2 AND status = 'PENDING'
            "#,
        )
        .bind(requester)
        .bind(recipient)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn contacts_of(&self, initiator: Uuid) -> StoreResult<Vec<Contact>> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE initiator = $1 ORDER BY id"
        ))
        .bind(initiator)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, contact_from_row)
    }

    async fn contact_exists(&self, initiator: Uuid, target: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM contacts WHERE initiator = $1 AND target = $2)",
        )
        .bind(initiator)
        .bind(target)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn remove_contact_pair(&self, user1: Uuid, user2: Uuid) -> StoreResult<bool> {
        // single statement, both directions
        let result = sqlx::query(
            r#"
            DELETE FROM contacts
            WHERE (initiator = $1 AND target = $2) OR (initiator = $2 AND target = $1)
            "#,
        )
        .bind(user1)
        .bind(user2)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<UserProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, username, email, display_name, photo_uri, status, created_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        collect(rows, profile_from_row)
    }

    async fn register(&self, profile: UserProfile) -> StoreResult<UserProfile> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, display_name, photo_uri, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(&profile.photo_uri)
        .bind(&profile.status)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;

        Ok(profile)
    }
}
