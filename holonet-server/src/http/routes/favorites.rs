//! Favorite endpoints - `/favorite/{people|planet}/{id}`

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use super::MessageResponse;
use crate::db::FavoriteRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, FavoritePath};
use crate::http::server::AppState;
use crate::models::FavoriteView;

/// POST /favorite/{kind}/{id}
async fn add_favorite(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    FavoritePath(target): FavoritePath,
) -> Result<(StatusCode, Json<FavoriteView>), ApiError> {
    let favorite = FavoriteRepo::new(&state.pool).add(user, target).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /favorite/{kind}/{id}
async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    FavoritePath(target): FavoritePath,
) -> Result<Json<MessageResponse>, ApiError> {
    FavoriteRepo::new(&state.pool).remove(user, target).await?;
    Ok(Json(MessageResponse::new(format!(
        "favorite {} {} removed",
        target.kind.resource(),
        target.id
    ))))
}

/// Favorite routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/favorite/{kind}/{id}",
        post(add_favorite).delete(remove_favorite),
    )
}
