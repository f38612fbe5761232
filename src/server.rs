//! HTTP persistence endpoint for the viewer.
//!
//! One resource: `GET` returns the saved document text (404 before the
//! first save), `POST` overwrites it with any body that parses as JSON.
//! Other methods get 405.

use crate::config::ServeArgs;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Well-known path the viewer loads from and saves to.
pub const GRAPH_PATH: &str = "/__schema-graph";

struct AppState {
    file: PathBuf,
    /// Serializes writers so concurrent saves never interleave.
    write_lock: Mutex<()>,
}

pub fn router(file: PathBuf) -> Router {
    let state = Arc::new(AppState {
        file,
        write_lock: Mutex::new(()),
    });

    Router::new()
        .route(
            GRAPH_PATH,
            get(load_graph).post(save_graph).fallback(method_not_allowed),
        )
        .with_state(state)
}

fn error_response(status: StatusCode, detail: impl ToString) -> Response {
    (status, Json(json!({ "error": detail.to_string() }))).into_response()
}

async fn load_graph(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::read_to_string(&state.file).await {
        Ok(text) => ([(header::CONTENT_TYPE, "application/json")], text).into_response(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            error_response(StatusCode::NOT_FOUND, "no saved schema graph")
        }
        Err(e) => {
            warn!(file = %state.file.display(), error = %e, "failed to read schema graph");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

async fn save_graph(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "rejected schema graph upload");
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    let text = match serde_json::to_string_pretty(&value) {
        Ok(text) => text,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let _guard = state.write_lock.lock().await;
    if let Err(e) = write_file(&state.file, &text).await {
        warn!(file = %state.file.display(), error = %e, "failed to write schema graph");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e);
    }

    info!(file = %state.file.display(), bytes = text.len(), "saved schema graph");
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

async fn write_file(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, text).await
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

pub async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let app = router(args.file.clone());
    let listener = tokio::net::TcpListener::bind(args.addr).await?;

    info!(addr = %args.addr, file = %args.file.display(), path = GRAPH_PATH, "serving schema graph");
    axum::serve(listener, app).await?;
    Ok(())
}
