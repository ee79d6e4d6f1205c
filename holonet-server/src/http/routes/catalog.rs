//! Catalog endpoints - `/people` and `/planets`
//!
//! The same handlers serve every `CatalogEntity`; `router::<E>(path)`
//! mounts them under the entity's collection path.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use super::MessageResponse;
use crate::db::CatalogRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{JsonObject, RecordId};
use crate::http::server::AppState;
use crate::models::{CatalogEntity, NewRecord, RecordPatch};

/// GET /{collection}
async fn list_records<E: CatalogEntity>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<E>>, ApiError> {
    let records = CatalogRepo::<E>::new(&state.pool).list().await?;
    Ok(Json(records))
}

/// GET /{collection}/{id}
async fn get_record<E: CatalogEntity>(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<E>, ApiError> {
    let record = CatalogRepo::<E>::new(&state.pool).get(id).await?;
    Ok(Json(record))
}

/// POST /{collection}
async fn create_record<E: CatalogEntity>(
    State(state): State<Arc<AppState>>,
    JsonObject(body): JsonObject,
) -> Result<(StatusCode, Json<E>), ApiError> {
    let record = NewRecord::from_payload::<E>(&body)?;
    let created = CatalogRepo::<E>::new(&state.pool).create(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /{collection}/{id}
async fn update_record<E: CatalogEntity>(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    JsonObject(body): JsonObject,
) -> Result<Json<E>, ApiError> {
    let repo = CatalogRepo::<E>::new(&state.pool);

    let patch = match RecordPatch::from_payload::<E>(&body) {
        Ok(patch) => patch,
        Err(e) => {
            // A missing record wins over a bad payload
            repo.get(id).await?;
            return Err(e.into());
        }
    };

    let updated = repo.update(id, patch).await?;
    Ok(Json(updated))
}

/// DELETE /{collection}/{id}
async fn delete_record<E: CatalogEntity>(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, ApiError> {
    CatalogRepo::<E>::new(&state.pool).delete(id).await?;
    Ok(Json(MessageResponse::new(format!(
        "{} {} deleted",
        E::RESOURCE,
        id
    ))))
}

/// Catalog routes for one entity kind
pub fn router<E: CatalogEntity>(path: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(path, get(list_records::<E>).post(create_record::<E>))
        .route(
            &format!("{}/{{id}}", path),
            get(get_record::<E>)
                .put(update_record::<E>)
                .delete(delete_record::<E>),
        )
}
