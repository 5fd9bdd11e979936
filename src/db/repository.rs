//! User repository for vimi.

use sqlx::QueryBuilder;

use super::user::{NewUser, Role, User};
use super::DbPool;
use crate::{Result, VimiError};

/// Repository for user lookups and directory maintenance.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, email, role) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| VimiError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| VimiError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, email, role, is_active, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VimiError::Database(e.to_string()))?;

        Ok(row.map(UserRow::into_user))
    }

    /// Get a user by exact username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, email, role, is_active, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VimiError::Database(e.to_string()))?;

        Ok(row.map(UserRow::into_user))
    }

    /// Fetch every user whose username is in `usernames`.
    ///
    /// Unknown names are simply absent from the result.
    pub async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<User>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new(
            "SELECT id, username, email, role, is_active, created_at FROM users WHERE username IN (",
        );
        let mut separated = query.separated(", ");
        for username in usernames {
            separated.push_bind(username);
        }
        separated.push_unseparated(") ORDER BY username");

        let rows: Vec<UserRow> = query
            .build_query_as()
            .fetch_all(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    /// Update the role of a user. Returns false if the user does not exist.
    pub async fn set_role(&self, id: i64, role: Role) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await
            .map_err(|e| VimiError::Database(e.to_string()))?;
        Ok(count)
    }
}

/// Internal struct for mapping database rows to User.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: Option<String>,
    role: String,
    is_active: bool,
    created_at: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            role: self.role.parse().unwrap_or(Role::Member),
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}
