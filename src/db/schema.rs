//! Database schema and migrations for vimi.
//!
//! Migrations are applied in order when the database is opened; the
//! `schema_version` table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: user directory mirrored from the identity provider
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    email       TEXT,
    role        TEXT NOT NULL DEFAULT 'member',  -- 'member', 'staff', 'superuser'
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: private messages; encrypted_content only ever holds envelopes
    r#"
CREATE TABLE private_messages (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    title               TEXT NOT NULL,
    sender_id           INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    encrypted_content   TEXT NOT NULL,
    is_read             INTEGER NOT NULL DEFAULT 0,
    created_at          TEXT NOT NULL
);

CREATE INDEX idx_private_messages_sender_id ON private_messages(sender_id);
CREATE INDEX idx_private_messages_created_at ON private_messages(created_at);
"#,
    // v3: recipient sets
    r#"
CREATE TABLE private_message_recipients (
    message_id  INTEGER NOT NULL REFERENCES private_messages(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (message_id, user_id)
);

CREATE INDEX idx_private_message_recipients_user_id ON private_message_recipients(user_id);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_migrations_are_valid_sql() {
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(migration.contains("CREATE TABLE") || migration.contains("ALTER TABLE"));
        }
    }

    #[test]
    fn test_messages_migration_columns() {
        let messages = MIGRATIONS[1];
        assert!(messages.contains("CREATE TABLE private_messages"));
        assert!(messages.contains("sender_id"));
        assert!(messages.contains("encrypted_content"));
        assert!(messages.contains("is_read"));
    }

    #[test]
    fn test_recipients_migration_primary_key() {
        let recipients = MIGRATIONS[2];
        assert!(recipients.contains("CREATE TABLE private_message_recipients"));
        assert!(recipients.contains("PRIMARY KEY (message_id, user_id)"));
    }
}
