use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Reflection of a request as received by `/echo`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Item>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/malformed", get(malformed))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Lists items; repeated `tag` parameters keep items carrying any of them.
async fn list_items(
    State(db): State<Db>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Vec<Item>> {
    let tags: Vec<&str> = query
        .iter()
        .filter(|(k, _)| k == "tag")
        .map(|(_, v)| v.as_str())
        .collect();
    let items = db.read().await;
    let mut found: Vec<Item> = items
        .values()
        .filter(|item| tags.is_empty() || item.tags.iter().any(|t| tags.contains(&t.as_str())))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    Json(found)
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        tags: input.tags,
    };
    db.write().await.insert(item.id, item.clone());
    tracing::debug!(id = %item.id, "created item");
    (StatusCode::CREATED, Json(item))
}

async fn get_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, StatusCode> {
    let items = db.read().await;
    items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Item>, StatusCode> {
    let mut items = db.write().await;
    let item = items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        item.name = name;
    }
    if let Some(tags) = input.tags {
        item.tags = tags;
    }
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, StatusCode> {
    let mut items = db.write().await;
    items.remove(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers,
        body,
    })
}

/// Replies with the requested status and an empty body.
async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

/// A 200 whose body does not fit `Item`.
async fn malformed() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "id": 42, "name": null }))
}
