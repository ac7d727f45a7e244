//! HTTP request handlers for the embed page host

use crate::consts::embed_consts::CONTAINER_ID;
use crate::consts::embed_consts::server::STATIC_CACHE_CONTROL;
use crate::controller::state::ControllerState;
use crate::controller::view::render;
use crate::server::ServerState;
use crate::server::pages::{
    NOT_FOUND_PAGE, Substitution, TEMPLATE_MISSING_PAGE, render_template, server_error_page,
};
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use log::{error, warn};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

const STATIC_NOT_FOUND: &str = "Arquivo estático não encontrado";

/// GET /
pub async fn index(State(state): State<Arc<ServerState>>) -> Response {
    let token = match state.tokens.scoped_token().await {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to mint scoped token: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(server_error_page(&e.to_string())),
            )
                .into_response();
        }
    };

    let template = match tokio::fs::read_to_string(&state.template_path).await {
        Ok(template) => template,
        Err(e) => {
            warn!(
                "Page template {} unavailable: {}",
                state.template_path.display(),
                e
            );
            return Html(TEMPLATE_MISSING_PAGE).into_response();
        }
    };

    let loading = render(&ControllerState::loading()).to_html();
    let page = render_template(
        &template,
        &[
            ("INSTANCE_URL", Substitution::Text(&state.config.instance_url)),
            ("WORKSPACE_ID", Substitution::Text(&state.config.workspace_id)),
            ("DASHBOARD_ID", Substitution::Text(&state.config.dashboard_id)),
            ("TOKEN", Substitution::Text(&token)),
            ("CONTAINER_ID", Substitution::Text(CONTAINER_ID)),
            ("DASHBOARD_CONTENT", Substitution::Markup(&loading)),
        ],
    );
    Html(page).into_response()
}

/// GET /static/*path
pub async fn static_file(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
) -> Response {
    let Some(file) = resolve_static(&state.static_dir, &path).await else {
        return not_found_text();
    };

    match tokio::fs::read(&file).await {
        Ok(content) => (
            [
                (header::CONTENT_TYPE, content_type(&file)),
                (header::CACHE_CONTROL, STATIC_CACHE_CONTROL),
            ],
            content,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to read static file {}: {}", file.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("Erro ao servir arquivo estático: {}", e),
            )
                .into_response()
        }
    }
}

/// Any other route
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE))
}

fn not_found_text() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        STATIC_NOT_FOUND,
    )
        .into_response()
}

/// Resolves a request path to an existing file inside `root`.
///
/// Returns `None` for missing files, directories and anything that resolves
/// outside `root` (dot segments, symlinks).
pub async fn resolve_static(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let root = tokio::fs::canonicalize(root).await.ok()?;
    let candidate = tokio::fs::canonicalize(root.join(requested.trim_start_matches('/')))
        .await
        .ok()?;
    if !candidate.starts_with(&root) {
        return None;
    }
    let metadata = tokio::fs::metadata(&candidate).await.ok()?;
    metadata.is_file().then_some(candidate)
}

/// Content type by file extension, `application/octet-stream` when unknown.
pub fn content_type(path: &FsPath) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" | "map" => "application/json",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/vnd.microsoft.icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
