use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    router(ServerState {
        engine: Arc::new(engine),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_group(app: &Router, title: &str) -> String {
    let (status, body) = send(app, Method::POST, "/groups", Some(json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn add_member(app: &Router, group: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/groups/{group}/members"),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance_minor"], 0);
    body["id"].as_str().unwrap().to_string()
}

async fn balances(app: &Router, group: &str) -> Vec<(String, i64)> {
    let (status, body) = send(app, Method::GET, &format!("/groups/{group}/members"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| {
            (
                m["name"].as_str().unwrap().to_string(),
                m["balance_minor"].as_i64().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn expense_settle_and_remove_flow() {
    let app = app().await;
    let group = create_group(&app, "Trip").await;
    let alice = add_member(&app, &group, "Alice").await;
    let bob = add_member(&app, &group, "Bob").await;
    add_member(&app, &group, "Carol").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/transactions"),
        Some(json!({
            "description": "Dinner",
            "amount_minor": 9000,
            "payer_id": alice,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["split_count"], 3);
    assert_eq!(body["payer_name"], "Alice");

    assert_eq!(
        balances(&app, &group).await,
        vec![
            ("Alice".to_string(), -6000),
            ("Bob".to_string(), 3000),
            ("Carol".to_string(), 3000),
        ]
    );

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/groups/{group}/members/{bob}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "member must be settled first. Balance: 30.00");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/settle/{bob}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "settled");
    assert_eq!(body["transactions"][0]["description"], "Settlement: Bob & Alice");
    assert_eq!(body["transactions"][0]["amount_minor"], 3000);
    assert_eq!(body["transactions"][0]["is_settlement"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/settle/{bob}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "already_settled");
    assert_eq!(body["transactions"], json!([]));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/groups/{group}/members/{bob}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/groups/{group}/transactions"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn percentage_and_custom_splits() {
    let app = app().await;
    let group = create_group(&app, "Flat").await;
    let alice = add_member(&app, &group, "Alice").await;
    let bob = add_member(&app, &group, "Bob").await;

    let (status, created) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/transactions"),
        Some(json!({
            "description": "Rent",
            "amount_minor": 100000,
            "payer_id": alice,
            "split_policy": "percentage",
            "splits": [
                { "member_id": alice, "value": 6000 },
                { "member_id": bob, "value": 4000 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, detail) = send(
        &app,
        Method::GET,
        &format!("/groups/{group}/transactions/{}", created["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let amounts: Vec<i64> = detail["splits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["amount_minor"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![60000, 40000]);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/transactions"),
        Some(json!({
            "description": "Groceries",
            "amount_minor": 1000,
            "payer_id": bob,
            "split_policy": "custom",
            "splits": [
                { "member_id": alice, "value": 500 },
                { "member_id": bob, "value": 300 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn error_statuses() {
    let app = app().await;
    let missing = uuid::Uuid::now_v7();

    let (status, _) = send(&app, Method::GET, &format!("/groups/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/groups/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/groups", Some(json!({ "name": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/groups", Some(json!({ "title": " " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let group = create_group(&app, "Trip").await;
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/transactions"),
        Some(json!({
            "description": "Dinner",
            "amount_minor": 1000,
            "payer_id": missing,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let alice = add_member(&app, &group, "Alice").await;
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/transactions"),
        Some(json!({
            "description": "Dinner",
            "amount_minor": -5,
            "payer_id": alice,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/groups/{group}/settle/{missing}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transaction_input_is_bounded() {
    let app = app().await;
    let group = create_group(&app, "Trip").await;
    let alice = add_member(&app, &group, "Alice").await;
    let bob = add_member(&app, &group, "Bob").await;
    let uri = format!("/groups/{group}/transactions");

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({
            "description": "Breakfast",
            "amount_minor": 1200,
            "payer_id": alice,
            "occurred_at": "2000-01-01T00:00:00Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["occurred_at"].as_str().unwrap().starts_with("2000"));

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({
            "description": "Settlement: Bob & Alice",
            "amount_minor": 600,
            "payer_id": alice,
            "split_policy": "custom",
            "splits": [{ "member_id": bob, "value": 600 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({
            "description": "Everything",
            "amount_minor": i64::MAX,
            "payer_id": alice,
            "split_policy": "custom",
            "splits": [
                { "member_id": alice, "value": i64::MAX },
                { "member_id": bob, "value": 1 },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, &format!("/groups/{group}/members"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_and_delete_groups() {
    let app = app().await;
    let trip = create_group(&app, "Trip").await;
    let flat = create_group(&app, "Flat").await;
    let alice = add_member(&app, &trip, "Alice").await;
    add_member(&app, &trip, "Bob").await;

    send(
        &app,
        Method::POST,
        &format!("/groups/{trip}/transactions"),
        Some(json!({
            "description": "Taxi",
            "amount_minor": 2000,
            "payer_id": alice,
        })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/groups", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"][0]["title"], "Trip");
    assert_eq!(body["groups"][0]["balance_minor"], -1000);
    assert_eq!(body["groups"][1]["balance_minor"], 0);

    let (status, _) = send(&app, Method::DELETE, &format!("/groups/{trip}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/groups", None).await;
    assert_eq!(body["groups"].as_array().unwrap().len(), 1);
    assert_eq!(body["groups"][0]["id"], flat);
}
