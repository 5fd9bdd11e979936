//! Message repository for vimi.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::QueryBuilder;

use super::types::{Message, NewMessage, Participant};
use crate::db::DbPool;
use crate::{Result, VimiError};

const SELECT_MESSAGES: &str = r#"
    SELECT m.id, m.title, m.sender_id, s.username AS sender_username,
           m.encrypted_content, m.is_read, m.created_at
    FROM private_messages m
    JOIN users s ON s.id = m.sender_id
"#;

/// Message IDs bound per recipient query, kept well under SQLite's
/// host parameter limit.
const RECIPIENT_BATCH_SIZE: usize = 500;

/// Repository for private message storage.
pub struct MessageRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new MessageRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Persist a message and its recipient set in one transaction.
    pub async fn create(&self, message: &NewMessage) -> Result<Message> {
        if message.recipient_ids.is_empty() {
            return Err(VimiError::Validation(
                "a message needs at least one recipient".to_string(),
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO private_messages (title, sender_id, encrypted_content, is_read, created_at)
            VALUES (?, ?, ?, 0, ?)
            RETURNING id
            "#,
        )
        .bind(&message.title)
        .bind(message.sender_id)
        .bind(message.content.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| VimiError::Database(e.to_string()))?;

        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("INSERT INTO private_message_recipients (message_id, user_id) ");
        query.push_values(&message.recipient_ids, |mut row, user_id| {
            row.push_bind(id).push_bind(*user_id);
        });
        query
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| VimiError::NotFound("message".to_string()))
    }

    /// Get a message by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Message>> {
        let sql = format!("{SELECT_MESSAGES} WHERE m.id = ?");
        let row: Option<MessageRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        match row {
            Some(row) => Ok(self.attach_recipients(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// List messages addressed to a user, newest first.
    pub async fn list_received(&self, user_id: i64) -> Result<Vec<Message>> {
        let sql = format!(
            "{SELECT_MESSAGES}
             WHERE m.id IN (SELECT message_id FROM private_message_recipients WHERE user_id = ?)
             ORDER BY m.created_at DESC, m.id DESC"
        );
        let rows: Vec<MessageRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        self.attach_recipients(rows).await
    }

    /// List messages sent by a user, newest first.
    pub async fn list_sent(&self, user_id: i64) -> Result<Vec<Message>> {
        let sql = format!("{SELECT_MESSAGES} WHERE m.sender_id = ? ORDER BY m.created_at DESC, m.id DESC");
        let rows: Vec<MessageRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        self.attach_recipients(rows).await
    }

    /// List every message in the store, newest first.
    pub async fn list_all(&self) -> Result<Vec<Message>> {
        let sql = format!("{SELECT_MESSAGES} ORDER BY m.created_at DESC, m.id DESC");
        let rows: Vec<MessageRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        self.attach_recipients(rows).await
    }

    /// Count unread messages addressed to a user.
    pub async fn count_unread(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM private_messages m
            JOIN private_message_recipients r ON r.message_id = m.id
            WHERE r.user_id = ? AND m.is_read = 0
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| VimiError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Mark a message as read.
    ///
    /// Returns true only for the call that performed the transition; the
    /// flag is never cleared.
    pub async fn mark_as_read(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE private_messages SET is_read = 1 WHERE id = ? AND is_read = 0")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach_recipients(&self, rows: Vec<MessageRow>) -> Result<Vec<Message>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut recipients: HashMap<i64, Vec<Participant>> = HashMap::new();
        for batch in rows.chunks(RECIPIENT_BATCH_SIZE) {
            let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(
                r#"
                SELECT r.message_id, u.id, u.username
                FROM private_message_recipients r
                JOIN users u ON u.id = r.user_id
                WHERE r.message_id IN ("#,
            );
            let mut separated = query.separated(", ");
            for row in batch {
                separated.push_bind(row.id);
            }
            separated.push_unseparated(") ORDER BY u.username");

            let recipient_rows: Vec<RecipientRow> = query
                .build_query_as()
                .fetch_all(self.pool)
                .await
                .map_err(|e| VimiError::Database(e.to_string()))?;

            for r in recipient_rows {
                recipients.entry(r.message_id).or_default().push(Participant {
                    id: r.id,
                    username: r.username,
                });
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let list = recipients.remove(&row.id).unwrap_or_default();
                row.into_message(list)
            })
            .collect())
    }
}

/// Internal struct for mapping database rows to Message.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    title: String,
    sender_id: i64,
    sender_username: String,
    encrypted_content: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self, recipients: Vec<Participant>) -> Message {
        Message {
            id: self.id,
            sender: Participant {
                id: self.sender_id,
                username: self.sender_username,
            },
            recipients,
            title: self.title,
            content: self.encrypted_content,
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecipientRow {
    message_id: i64,
    id: i64,
    username: String,
}
