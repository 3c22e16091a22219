//! Ad-hoc in-memory REST server for local development.
//!
//! Any path is a resource: `/{resource}` is the collection and
//! `/{resource}/{id}` a member. Records are JSON objects and get a
//! server-assigned UUID `id` on create.

pub mod store;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use store::ResourceStore;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct ServerState {
    root: Arc<str>,
    store: Arc<RwLock<ResourceStore>>,
}

impl ServerState {
    pub fn new(root: &str) -> Self {
        Self {
            root: Arc::from(root),
            store: Arc::new(RwLock::new(ResourceStore::default())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Route {
    resource: String,
    id: String,
}

fn route_for(path: &str) -> Route {
    let mut parts = path.trim_start_matches('/').split('/');
    Route {
        resource: parts.next().unwrap_or_default().to_string(),
        id: parts.next().unwrap_or_default().to_string(),
    }
}

enum ServerError {
    BadBody(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::BadBody(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                serde_json::json!({ "status": "500", "message": message }).to_string(),
            )
                .into_response(),
        }
    }
}

pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .fallback(handle)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ServerError> {
    let path = uri.path().strip_prefix(&*state.root).unwrap_or(uri.path());
    let route = route_for(path);

    let response = match method {
        Method::POST => {
            let record = parse_object(&body)?;
            let id = state.store.write().await.create(&route.resource, record);
            let location = format!("/{}/{}", route.resource, id);
            tracing::info!("Created {}", location);
            (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
        }
        Method::GET if route.id.is_empty() => {
            let listing = state.store.read().await.list(&route.resource);
            json_response(serde_json::Value::Array(listing).to_string())
        }
        Method::GET => match state.store.read().await.get(&route.resource, &route.id) {
            Some(record) => json_response(record.to_string()),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        Method::PUT => {
            tracing::info!("PUT /{}/{} accepted without changes", route.resource, route.id);
            (StatusCode::OK, "PUT\n").into_response()
        }
        Method::DELETE => {
            if state.store.write().await.remove(&route.resource, &route.id) {
                StatusCode::OK.into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        Method::HEAD => {
            tracing::warn!("Unsupported method");
            StatusCode::METHOD_NOT_ALLOWED.into_response()
        }
        other => {
            tracing::warn!("Unknown request method \"{}\"", other);
            StatusCode::METHOD_NOT_ALLOWED.into_response()
        }
    };

    Ok(response)
}

fn parse_object(body: &[u8]) -> Result<serde_json::Map<String, serde_json::Value>, ServerError> {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(ServerError::BadBody(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(ServerError::BadBody(e.to_string())),
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn json_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub async fn serve(addr: SocketAddr, root: &str) -> crate::utils::error::Result<()> {
    let app = build_router(ServerState::new(root));

    tracing::info!("Mollusk dev server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
