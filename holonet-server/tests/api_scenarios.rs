//! End-to-end API scenarios against an in-memory database

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use holonet_server::db::UserRepo;
use holonet_server::{build_router, create_memory_pool, seed_current_user, ServerConfig, UserId};

async fn app() -> Router {
    let pool = create_memory_pool().await.expect("pool creation failed");
    UserRepo::new(&pool)
        .ensure(UserId(1), "luke@rebels.org")
        .await
        .expect("seeding user failed");
    build_router(pool, &ServerConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_planets(app: &Router, names: &[&str]) {
    for name in names {
        let (status, _) = send(app, Method::POST, "/planets", Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn person_lifecycle() {
    let app = app().await;

    let (status, created) = send(&app, Method::POST, "/people", Some(json!({"name": "Luke"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({
            "id": 1,
            "name": "Luke",
            "height": null,
            "mass": null,
            "hair_color": null,
            "skin_color": null,
            "eye_color": null,
            "birth_year": null,
            "gender": null
        })
    );

    let (status, fetched) = send(&app, Method::GET, "/people/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(&app, Method::PUT, "/people/1", Some(json!({"height": "172"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["height"], "172");
    assert_eq!(updated["name"], "Luke");

    let (status, body) = send(&app, Method::DELETE, "/people/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "person 1 deleted");

    let (status, body) = send(&app, Method::GET, "/people/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["msg"], "person '1' not found");
}

#[tokio::test]
async fn create_returns_exactly_supplied_fields() {
    let app = app().await;

    let (status, planet) = send(
        &app,
        Method::POST,
        "/planets",
        Some(json!({"name": "Tatooine", "climate": "arid", "population": "200000"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(planet["climate"], "arid");
    assert_eq!(planet["population"], "200000");
    assert!(planet["terrain"].is_null());

    let (_, listed) = send(&app, Method::GET, "/planets", None).await;
    assert_eq!(listed, json!([planet]));
}

#[tokio::test]
async fn create_requires_name() {
    let app = app().await;

    for body in [
        Some(json!({})),
        Some(json!({"name": ""})),
        Some(json!({"name": 0})),
        Some(json!({"name": false})),
        Some(json!({"height": "1"})),
        None,
    ] {
        let (status, error) = send(&app, Method::POST, "/people", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"], "validation_error");
    }

    let (_, listed) = send(&app, Method::GET, "/people", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/planets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let app = app().await;

    let (status, _) = send(&app, Method::PUT, "/planets/3", Some(json!({"terrain": "ice"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Missing record is reported before payload problems
    let (status, _) = send(&app, Method::PUT, "/planets/3", Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/planets/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_ids_are_not_found() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/people/luke", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/favorite/starship/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, "/favorite/planet/five", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn favorite_planet_scenario() {
    let app = app().await;

    let (status, _) = send(&app, Method::POST, "/favorite/planet/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create_planets(&app, &["Tatooine", "Alderaan", "Yavin IV", "Hoth", "Dagobah"]).await;

    let (status, favorite) = send(&app, Method::POST, "/favorite/planet/5", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(favorite["user_id"], 1);
    assert_eq!(favorite["planet_id"], 5);
    assert!(favorite["people_id"].is_null());
    assert_eq!(favorite["planet"]["name"], "Dagobah");

    let (status, error) = send(&app, Method::POST, "/favorite/planet/5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "conflict");
}

#[tokio::test]
async fn favorites_list_expands_targets() {
    let app = app().await;
    create_planets(&app, &["Hoth"]).await;
    send(&app, Method::POST, "/people", Some(json!({"name": "Leia", "hair_color": "brown"}))).await;

    send(&app, Method::POST, "/favorite/people/1", None).await;
    send(&app, Method::POST, "/favorite/planet/1", None).await;

    let (status, favorites) = send(&app, Method::GET, "/users/favorites", None).await;
    assert_eq!(status, StatusCode::OK);

    let favorites = favorites.as_array().unwrap();
    assert_eq!(favorites.len(), 2);
    assert_eq!(favorites[0]["people"]["hair_color"], "brown");
    assert!(favorites[0]["planet"].is_null());
    assert_eq!(favorites[1]["planet"]["name"], "Hoth");
    assert!(favorites[1]["people"].is_null());
}

#[tokio::test]
async fn deleting_planet_removes_its_favorites() {
    let app = app().await;
    create_planets(&app, &["Alderaan"]).await;
    send(&app, Method::POST, "/favorite/planet/1", None).await;

    let (status, _) = send(&app, Method::DELETE, "/planets/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, favorites) = send(&app, Method::GET, "/users/favorites", None).await;
    assert_eq!(favorites, json!([]));
}

#[tokio::test]
async fn remove_favorite() {
    let app = app().await;
    send(&app, Method::POST, "/people", Some(json!({"name": "Chewbacca"}))).await;

    let (status, error) = send(&app, Method::DELETE, "/favorite/people/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "not_found");

    send(&app, Method::POST, "/favorite/people/1", None).await;
    let (status, body) = send(&app, Method::DELETE, "/favorite/people/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "favorite person 1 removed");

    let (status, _) = send(&app, Method::DELETE, "/favorite/people/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_are_listed() {
    let app = app().await;

    let (status, users) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        users,
        json!([{"id": 1, "email": "luke@rebels.org", "is_active": true}])
    );
}

#[tokio::test]
async fn favorites_follow_configured_user() {
    let pool = create_memory_pool().await.unwrap();
    let users = UserRepo::new(&pool);
    users.ensure(UserId(1), "luke@rebels.org").await.unwrap();
    users.ensure(UserId(2), "leia@rebels.org").await.unwrap();

    let as_leia = build_router(
        pool.clone(),
        &ServerConfig {
            current_user: UserId(2),
            ..ServerConfig::default()
        },
    );
    let as_luke = build_router(pool, &ServerConfig::default());

    create_planets(&as_leia, &["Alderaan"]).await;
    let (status, favorite) = send(&as_leia, Method::POST, "/favorite/planet/1", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(favorite["user_id"], 2);

    let (_, favorites) = send(&as_luke, Method::GET, "/users/favorites", None).await;
    assert_eq!(favorites, json!([]));

    // Same target for a different user is not a duplicate
    let (status, _) = send(&as_luke, Method::POST, "/favorite/planet/1", None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn favorites_work_on_fresh_database_with_default_config() {
    let pool = create_memory_pool().await.unwrap();
    let config = ServerConfig::default();
    seed_current_user(&pool, &config).await.unwrap();
    let app = build_router(pool, &config);

    create_planets(&app, &["Tatooine", "Alderaan", "Yavin IV", "Hoth", "Dagobah"]).await;

    let (status, favorite) = send(&app, Method::POST, "/favorite/planet/5", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(favorite["user_id"], 1);

    let (_, users) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(users, json!([{"id": 1, "email": "user1@holonet.local", "is_active": true}]));
}

#[tokio::test]
async fn health_reports_database() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "up");
}
