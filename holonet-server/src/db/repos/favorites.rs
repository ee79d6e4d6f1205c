//! Favorites repository
//!
//! - add: a single `INSERT ... SELECT` so target existence and the write
//!   are atomic; duplicates are rejected by the UNIQUE constraints, not by
//!   a pre-check
//! - list: one query per target kind to expand records (no N+1)

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use super::catalog::fetch_by_id;
use super::{is_foreign_key_violation, is_unique_violation, DbError};
use crate::models::{
    CatalogEntity, Favorite, FavoriteTarget, FavoriteView, Person, Planet, TargetKind, UserId,
};

const FAVORITE_COLUMNS: &str = "id, user_id, people_id, planet_id";

/// Favorites repository
pub struct FavoriteRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FavoriteRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add `target` to the user's favorites.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the target or the user does not exist
    /// - `Conflict` when the user already has this favorite
    pub async fn add(&self, user: UserId, target: FavoriteTarget) -> Result<FavoriteView, DbError> {
        // Existence check and insert are one statement: a missing target
        // inserts nothing, and the write lock is taken up front.
        let inserted = sqlx::query_as::<_, Favorite>(&format!(
            "INSERT INTO favorites (user_id, {}) SELECT ?, id FROM {} WHERE id = ? RETURNING {}",
            target.kind.column(),
            target_table(target.kind),
            FAVORITE_COLUMNS
        ))
        .bind(user.get())
        .bind(target.id)
        .fetch_optional(self.pool)
        .await;

        let favorite = match inserted {
            Ok(Some(favorite)) => favorite,
            Ok(None) => return Err(DbError::not_found(target.kind.resource(), target.id)),
            Err(e) if is_unique_violation(&e) => {
                return Err(DbError::Conflict {
                    message: format!(
                        "{} {} is already in favorites",
                        target.kind.resource(),
                        target.id
                    ),
                });
            }
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(self.missing_reference(user, target).await);
            }
            Err(e) => return Err(e.into()),
        };

        let mut conn = self.pool.acquire().await?;
        let view = expand(&mut *conn, favorite).await?;

        tracing::debug!(user = %user, kind = %target.kind, id = target.id, "favorite added");
        Ok(view)
    }

    /// Work out which reference a rejected insert was missing. The target
    /// can vanish between the select and the constraint check.
    async fn missing_reference(&self, user: UserId, target: FavoriteTarget) -> DbError {
        let target_exists = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)",
            target_table(target.kind)
        ))
        .bind(target.id)
        .fetch_one(self.pool)
        .await;

        match target_exists {
            Ok(0) => DbError::not_found(target.kind.resource(), target.id),
            Ok(_) => DbError::not_found("user", user),
            Err(e) => e.into(),
        }
    }

    /// Remove `target` from the user's favorites.
    pub async fn remove(&self, user: UserId, target: FavoriteTarget) -> Result<(), DbError> {
        let deleted = sqlx::query(&format!(
            "DELETE FROM favorites WHERE user_id = ? AND {} = ?",
            target.kind.column()
        ))
        .bind(user.get())
        .bind(target.id)
        .execute(self.pool)
        .await?
        .rows_affected();

        if deleted == 0 {
            return Err(DbError::not_found(
                "favorite",
                format!("{}/{}", target.kind, target.id),
            ));
        }

        tracing::debug!(user = %user, kind = %target.kind, id = target.id, "favorite removed");
        Ok(())
    }

    /// List the user's favorites with their targets expanded.
    pub async fn list(&self, user: UserId) -> Result<Vec<FavoriteView>, DbError> {
        let mut tx = self.pool.begin().await?;

        let favorites = sqlx::query_as::<_, Favorite>(&format!(
            "SELECT {} FROM favorites WHERE user_id = ? ORDER BY id",
            FAVORITE_COLUMNS
        ))
        .bind(user.get())
        .fetch_all(&mut *tx)
        .await?;

        let people = favorite_targets::<Person>(&mut tx, user).await?;
        let planets = favorite_targets::<Planet>(&mut tx, user).await?;
        tx.commit().await?;

        Ok(favorites
            .into_iter()
            .map(|favorite| {
                let id = favorite.target.id;
                FavoriteView::new(favorite, people.get(&id).cloned(), planets.get(&id).cloned())
            })
            .collect())
    }
}

fn target_table(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::People => Person::TABLE,
        TargetKind::Planet => Planet::TABLE,
    }
}

async fn expand(conn: &mut SqliteConnection, favorite: Favorite) -> Result<FavoriteView, sqlx::Error> {
    let id = favorite.target.id;
    let view = match favorite.target.kind {
        TargetKind::People => {
            let person = fetch_by_id::<Person>(conn, id).await?;
            FavoriteView::new(favorite, person, None)
        }
        TargetKind::Planet => {
            let planet = fetch_by_id::<Planet>(conn, id).await?;
            FavoriteView::new(favorite, None, planet)
        }
    };
    Ok(view)
}

/// Records of kind `E` referenced by the user's favorites, keyed by id.
async fn favorite_targets<E: CatalogEntity>(
    conn: &mut SqliteConnection,
    user: UserId,
) -> Result<HashMap<i64, E>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id IN (SELECT {} FROM favorites WHERE user_id = ?)",
        E::columns(),
        E::TABLE,
        E::TARGET.column()
    );

    let records = sqlx::query_as::<_, E>(&sql)
        .bind(user.get())
        .fetch_all(conn)
        .await?;

    Ok(records.into_iter().map(|r| (r.id(), r)).collect())
}
