//! HttpListStore against an in-process json-server lookalike

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use shopping_list::repository::{HttpListStore, RemoteListStore};
use shopping_list::{DomainError, ListPatch, ShoppingList};

type Records = Arc<Mutex<Vec<Value>>>;

async fn list_all(State(records): State<Records>) -> Json<Value> {
    Json(Value::Array(records.lock().await.clone()))
}

async fn create(State(records): State<Records>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    records.lock().await.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn get_one(State(records): State<Records>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    records
        .lock()
        .await
        .iter()
        .find(|r| r["id"] == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn patch_one(
    State(records): State<Records>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut records = records.lock().await;
    let record = records
        .iter_mut()
        .find(|r| r["id"] == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), body) {
        target.extend(fields);
    }
    Ok(Json(record.clone()))
}

async fn delete_one(State(records): State<Records>, Path(id): Path<String>) -> Json<Value> {
    records.lock().await.retain(|r| r["id"] != id);
    Json(json!({}))
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/shoppingLists", addr)
}

async fn json_server(seed: Vec<Value>) -> (HttpListStore, Records) {
    let records: Records = Arc::new(Mutex::new(seed));
    let router = Router::new()
        .route("/shoppingLists", get(list_all).post(create))
        .route("/shoppingLists/:id", get(get_one).patch(patch_one).delete(delete_one))
        .with_state(records.clone());
    (HttpListStore::new(serve(router).await), records)
}

fn dinner() -> Value {
    json!({
        "id": "1",
        "title": "For dinner",
        "owner": "you",
        "members": ["Jane"],
        "items": [{ "id": "i1", "name": "Milk", "isDone": false }]
    })
}

#[tokio::test]
async fn test_fetch_all_and_one() {
    let (store, _) = json_server(vec![dinner()]).await;

    let all = store.fetch_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["title"], "For dinner");

    let one = store.fetch_one("1").await.unwrap();
    assert_eq!(one["items"][0]["name"], "Milk");
}

#[tokio::test]
async fn test_create_sends_full_list() {
    let (store, records) = json_server(Vec::new()).await;
    let list = ShoppingList::new("abc", "Party", "you");

    let echo = store.create(&list).await.unwrap();
    assert_eq!(echo["id"], "abc");

    let stored = records.lock().await.clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["title"], "Party");
    assert_eq!(stored[0]["owner"], "you");
    assert_eq!(stored[0]["items"], json!([]));
}

#[tokio::test]
async fn test_update_sends_only_patched_fields() {
    let (store, records) = json_server(vec![dinner()]).await;

    let response = store.update("1", &ListPatch::title("Lunch")).await.unwrap();
    assert_eq!(response["title"], "Lunch");
    assert_eq!(response["members"], json!(["Jane"]));

    let stored = records.lock().await.clone();
    assert_eq!(stored[0]["title"], "Lunch");
    assert_eq!(stored[0]["items"][0]["name"], "Milk");
}

#[tokio::test]
async fn test_delete_removes_record() {
    let (store, records) = json_server(vec![dinner()]).await;
    store.delete("1").await.unwrap();
    assert!(records.lock().await.is_empty());
}

#[tokio::test]
async fn test_missing_record_maps_to_http_error() {
    let (store, _) = json_server(Vec::new()).await;
    match store.update("nope", &ListPatch::archived(true)).await {
        Err(DomainError::Http { context, status, .. }) => {
            assert_eq!(context, "Failed to update list");
            assert_eq!(status, 404);
        }
        other => panic!("expected http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_body_becomes_detail() {
    let router = Router::new().route(
        "/shoppingLists",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database offline") }),
    );
    let store = HttpListStore::new(serve(router).await);

    let err = store.fetch_all().await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.to_string(), "Failed to fetch shopping lists: database offline");
}

#[tokio::test]
async fn test_empty_patch_response_is_null() {
    let router = Router::new().route(
        "/shoppingLists/:id",
        axum::routing::patch(|| async { StatusCode::NO_CONTENT }),
    );
    let store = HttpListStore::new(serve(router).await);

    let response = store.update("1", &ListPatch::title("Lunch")).await.unwrap();
    assert_eq!(response, Value::Null);
}

#[tokio::test]
async fn test_non_array_collection_is_decode_error() {
    let router = Router::new().route("/shoppingLists", get(|| async { Json(json!({ "lists": [] })) }));
    let store = HttpListStore::new(serve(router).await);

    assert!(matches!(store.fetch_all().await, Err(DomainError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpListStore::new(format!("http://{}/shoppingLists", addr));
    assert!(matches!(store.fetch_all().await, Err(DomainError::Transport(_))));
}
