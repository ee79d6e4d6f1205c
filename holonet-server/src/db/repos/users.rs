//! User repository

use sqlx::SqlitePool;

use super::{is_unique_violation, DbError};
use crate::models::{User, UserId};

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every user in id order.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, is_active FROM users ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Get a single user by id.
    pub async fn get(&self, id: UserId) -> Result<User, DbError> {
        sqlx::query_as::<_, User>("SELECT id, email, is_active FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", id))
    }

    /// Create an active user. Emails are unique.
    pub async fn create(&self, email: &str) -> Result<User, DbError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (email) VALUES (?) RETURNING id, email, is_active",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(user) => {
                tracing::debug!(id = user.id, "user created");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => Err(email_taken(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Make sure a user with this id exists, creating it with `email` if
    /// it does not. An existing user is returned as stored.
    pub async fn ensure(&self, id: UserId, email: &str) -> Result<User, DbError> {
        let result = sqlx::query("INSERT INTO users (id, email) VALUES (?, ?) ON CONFLICT(id) DO NOTHING")
            .bind(id.get())
            .bind(email)
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => {
                tracing::info!(%id, email, "seeded user");
            }
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(email_taken(email)),
            Err(e) => return Err(e.into()),
        }

        self.get(id).await
    }

    /// Delete a user together with their favorites.
    pub async fn delete(&self, id: UserId) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM favorites WHERE user_id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DbError::not_found("user", id));
        }

        tx.commit().await?;
        Ok(())
    }
}

fn email_taken(email: &str) -> DbError {
    DbError::Conflict {
        message: format!("email '{}' is already registered", email),
    }
}
