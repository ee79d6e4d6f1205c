//! Custom Axum extractors

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde_json::{Map, Value};

use super::error::ApiError;
use super::server::AppState;
use crate::models::{FavoriteTarget, TargetKind, UserId, ValidationError};

/// Integer record id from the path.
///
/// Anything that is not an integer addresses no record, so it is a 404
/// rather than a 400.
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found("record", String::new()))?;

        let id = raw.parse::<i64>().map_err(|_| not_found("record", raw))?;
        Ok(Self(id))
    }
}

/// Favorite target from `/favorite/{kind}/{id}`
pub struct FavoritePath(pub FavoriteTarget);

impl<S> FromRequestParts<S> for FavoritePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((kind, id)): Path<(String, String)> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found("favorite", String::new()))?;

        let target = match (TargetKind::from_segment(&kind), id.parse::<i64>()) {
            (Some(kind), Ok(id)) => FavoriteTarget::new(kind, id),
            _ => return Err(not_found("favorite", format!("{}/{}", kind, id))),
        };

        Ok(Self(target))
    }
}

/// The user the request acts for.
///
/// Resolved from server configuration; no credential is read.
pub struct CurrentUser(pub UserId);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.current_user))
    }
}

/// Request body as a JSON object. An empty body reads as `{}`.
pub struct JsonObject(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| invalid_body("unreadable request body"))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Map::new()));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(invalid_body("expected a JSON object")),
            Err(_) => Err(invalid_body("malformed JSON")),
        }
    }
}

fn not_found(resource: &'static str, id: String) -> ApiError {
    ApiError::NotFound { resource, id }
}

fn invalid_body(reason: &'static str) -> ApiError {
    ApiError::Validation(ValidationError::InvalidFormat {
        field: "body",
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    async fn json_object(body: &'static str) -> Result<JsonObject, ApiError> {
        let req = http::Request::builder().body(Body::from(body)).unwrap();
        JsonObject::from_request(req, &()).await
    }

    #[tokio::test]
    async fn empty_body_is_empty_object() {
        let JsonObject(map) = json_object("").await.unwrap();
        assert!(map.is_empty());

        let JsonObject(map) = json_object("  \n").await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn object_body_is_parsed() {
        let JsonObject(map) = json_object(r#"{"name": "Luke"}"#).await.unwrap();
        assert_eq!(map["name"], "Luke");
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        for body in ["[1, 2]", "\"Luke\"", "{not json"] {
            let err = json_object(body).await.err().unwrap();
            assert!(matches!(
                err,
                ApiError::Validation(ValidationError::InvalidFormat { field: "body", .. })
            ));
        }
    }
}
