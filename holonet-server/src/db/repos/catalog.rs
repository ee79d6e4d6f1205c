//! Catalog repository - people and planets
//!
//! One generic repository serves every `CatalogEntity`:
//! - create/update: single statement with RETURNING
//! - delete: removes referencing favorites first, in one transaction

use std::marker::PhantomData;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::DbError;
use crate::models::{CatalogEntity, NewRecord, RecordPatch};

/// Repository for one catalog entity kind
pub struct CatalogRepo<'a, E> {
    pool: &'a SqlitePool,
    _entity: PhantomData<E>,
}

impl<'a, E: CatalogEntity> CatalogRepo<'a, E> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// List every record in id order.
    pub async fn list(&self) -> Result<Vec<E>, DbError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", E::columns(), E::TABLE);
        let records = sqlx::query_as::<_, E>(&sql).fetch_all(self.pool).await?;
        Ok(records)
    }

    /// Get a single record by id.
    pub async fn get(&self, id: i64) -> Result<E, DbError> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id::<E>(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found(E::RESOURCE, id))
    }

    /// Insert a record and return it with its assigned id.
    pub async fn create(&self, record: NewRecord) -> Result<E, DbError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (name", E::TABLE));
        for (column, _) in &record.attributes {
            builder.push(", ").push(*column);
        }
        builder.push(") VALUES (");

        let mut values = builder.separated(", ");
        values.push_bind(record.name);
        for (_, value) in record.attributes {
            values.push_bind(value);
        }
        builder.push(format!(") RETURNING {}", E::columns()));

        let created = builder.build_query_as::<E>().fetch_one(self.pool).await?;
        tracing::debug!(resource = E::RESOURCE, id = created.id(), "record created");
        Ok(created)
    }

    /// Overwrite the fields present in `patch`, leaving the rest untouched.
    pub async fn update(&self, id: i64, patch: RecordPatch) -> Result<E, DbError> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", E::TABLE));
        let mut assignments = builder.separated(", ");
        if let Some(name) = patch.name {
            assignments.push("name = ").push_bind_unseparated(name);
        }
        for (column, value) in patch.attributes {
            assignments
                .push(format!("{} = ", column))
                .push_bind_unseparated(value);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", E::columns()));

        let updated = builder
            .build_query_as::<E>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(E::RESOURCE, id))?;

        tracing::debug!(resource = E::RESOURCE, id, "record updated");
        Ok(updated)
    }

    /// Delete a record together with every favorite referencing it.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let favorites = sqlx::query(&format!(
            "DELETE FROM favorites WHERE {} = ?",
            E::TARGET.column()
        ))
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let deleted = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", E::TABLE))
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls it back
            return Err(DbError::not_found(E::RESOURCE, id));
        }

        tx.commit().await?;
        tracing::debug!(resource = E::RESOURCE, id, favorites, "record deleted");
        Ok(())
    }
}

/// Fetch a record by id on an open connection or transaction.
pub(crate) async fn fetch_by_id<E: CatalogEntity>(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<E>, sqlx::Error> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", E::columns(), E::TABLE);
    sqlx::query_as::<_, E>(&sql).bind(id).fetch_optional(conn).await
}
