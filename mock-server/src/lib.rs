use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Widget {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateWidget {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct BulkParams {
    pub bytes: usize,
}

pub type Db = Arc<RwLock<BTreeMap<u64, Widget>>>;

/// Router seeded with a single widget (`id` 1, "sprocket").
pub fn app() -> Router {
    let mut widgets = BTreeMap::new();
    widgets.insert(
        1,
        Widget {
            id: 1,
            name: "sprocket".to_string(),
        },
    );
    let db: Db = Arc::new(RwLock::new(widgets));
    Router::new()
        .route("/widgets", get(list_widgets).post(create_widget))
        .route("/widgets/{id}", get(get_widget).delete(delete_widget))
        .route("/oops", get(oops))
        .route("/echo", get(echo_headers))
        .route("/bulk", get(bulk))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_widgets(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Widget>> {
    let widgets = db.read().await;
    let limit = params.limit.unwrap_or(usize::MAX);
    Json(widgets.values().take(limit).cloned().collect())
}

async fn create_widget(
    State(db): State<Db>,
    Json(input): Json<CreateWidget>,
) -> (StatusCode, Json<Widget>) {
    let mut widgets = db.write().await;
    let id = widgets.keys().next_back().map_or(1, |last| last + 1);
    let widget = Widget { id, name: input.name };
    widgets.insert(id, widget.clone());
    (StatusCode::CREATED, Json(widget))
}

async fn get_widget(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Widget>, StatusCode> {
    let widgets = db.read().await;
    widgets.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_widget(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut widgets = db.write().await;
    widgets.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

/// Always answers with a plain-text body, for exercising non-JSON responses.
async fn oops() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "text/plain")], "oops")
}

/// Reflects the received request headers back as a JSON object.
async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let echoed = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(echoed)
}

/// A JSON string of `bytes` filler characters, for large-body round trips.
async fn bulk(Query(params): Query<BulkParams>) -> Json<String> {
    Json("a".repeat(params.bytes))
}
