use crate::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the mock catalog answers a details request for one identifier.
#[derive(Debug, Clone)]
pub enum MockApp {
    /// `success: true` with the given details.
    Found { name: String, header_image: String },
    /// `success: false`.
    NotFound,
    /// The identifier is absent from the response object.
    Missing,
    /// A `200 OK` body that is not JSON.
    Malformed,
    /// A bare error status.
    Status(u16),
    /// An error status with a custom body.
    ErrorBody { status: u16, body: String },
    /// Sleeps before answering like [`MockApp::Missing`].
    Slow(Duration),
}

impl MockApp {
    pub fn found(name: impl Into<String>, header_image: impl Into<String>) -> Self {
        Self::Found {
            name: name.into(),
            header_image: header_image.into(),
        }
    }
}

/// One search hit served by the mock catalog.
#[derive(Debug, Clone)]
pub struct MockSearchItem {
    pub id: u32,
    pub name: String,
    pub tiny_image: String,
}

#[derive(Debug, Default)]
struct MockState {
    apps: Mutex<HashMap<u32, MockApp>>,
    search_items: Mutex<Vec<MockSearchItem>>,
    last_query: Mutex<Option<HashMap<String, String>>>,
    last_user_agent: Mutex<Option<String>>,
    lookups: AtomicUsize,
    searches: AtomicUsize,
}

/// Test fixture for an HTTP catalog on an ephemeral local port.
///
/// Serves `/api/appdetails` and `/api/storesearch/` in the remote
/// catalog's response shapes. The server stops when the fixture drops.
pub struct MockCatalogServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    task: JoinHandle<()>,
}

impl MockCatalogServer {
    /// Binds to `127.0.0.1:0` and starts serving.
    pub async fn start() -> Result<Self> {
        let state = Arc::new(MockState::default());
        let router = Router::new()
            .route("/api/appdetails", get(app_details))
            .route("/api/storesearch/", get(store_search))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { addr, state, task })
    }

    /// Base URL to point a catalog client at.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_app(&self, id: u32, app: MockApp) {
        self.state.apps.lock().insert(id, app);
    }

    pub fn set_search_items(&self, items: Vec<MockSearchItem>) {
        *self.state.search_items.lock() = items;
    }

    /// Number of details requests served.
    pub fn lookups(&self) -> usize {
        self.state.lookups.load(Ordering::SeqCst)
    }

    /// Number of search requests served.
    pub fn searches(&self) -> usize {
        self.state.searches.load(Ordering::SeqCst)
    }

    /// Query parameters of the most recent request.
    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.state.last_query.lock().clone()
    }

    /// `User-Agent` header of the most recent request.
    pub fn last_user_agent(&self) -> Option<String> {
        self.state.last_user_agent.lock().clone()
    }
}

impl Drop for MockCatalogServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn record_request(state: &MockState, params: &HashMap<String, String>, headers: &axum::http::HeaderMap) {
    *state.last_query.lock() = Some(params.clone());
    *state.last_user_agent.lock() = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
}

async fn app_details(
    State(state): State<Arc<MockState>>,
    headers: axum::http::HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.lookups.fetch_add(1, Ordering::SeqCst);
    record_request(&state, &params, &headers);

    let key = params.get("appids").cloned().unwrap_or_default();
    let app = key
        .parse::<u32>()
        .ok()
        .and_then(|id| state.apps.lock().get(&id).cloned())
        .unwrap_or(MockApp::Missing);

    let mut body = Map::new();
    match app {
        MockApp::Found { name, header_image } => {
            body.insert(
                key,
                json!({
                    "success": true,
                    "data": { "type": "game", "name": name, "header_image": header_image }
                }),
            );
        }
        MockApp::NotFound => {
            body.insert(key, json!({ "success": false }));
        }
        MockApp::Missing => {}
        MockApp::Malformed => {
            return (StatusCode::OK, "<html>rate limited</html>").into_response();
        }
        MockApp::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, "catalog unavailable").into_response();
        }
        MockApp::ErrorBody { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, body).into_response();
        }
        MockApp::Slow(delay) => {
            tokio::time::sleep(delay).await;
        }
    }

    Json(Value::Object(body)).into_response()
}

async fn store_search(
    State(state): State<Arc<MockState>>,
    headers: axum::http::HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.searches.fetch_add(1, Ordering::SeqCst);
    record_request(&state, &params, &headers);

    let items = state
        .search_items
        .lock()
        .iter()
        .map(|item| {
            json!({
                "type": "app",
                "id": item.id,
                "name": item.name,
                "tiny_image": item.tiny_image,
            })
        })
        .collect::<Vec<_>>();

    Json(json!({ "total": items.len(), "items": items })).into_response()
}
