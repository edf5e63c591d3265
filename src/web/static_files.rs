//! Static file serving for the yamlform web UI.
//!
//! The front end is a handful of hand-written files under `web/static`,
//! embedded into the binary at compile time.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::Path;

/// Embedded front end files.
#[derive(Embed)]
#[folder = "web/static"]
pub struct StaticAssets;

/// Serves static files, falling back to `index.html` for page routes.
pub async fn serve_static(request: Request) -> Response {
    let path = request.uri().path().trim_start_matches('/');

    if path.is_empty() {
        return serve_file("index.html");
    }

    if let Some(content) = StaticAssets::get(path) {
        return file_response(path, content.data.as_ref());
    }

    // Unknown API routes and missing assets are real 404s
    let looks_like_file = Path::new(path)
        .extension()
        .is_some_and(|ext| !ext.is_empty());
    if looks_like_file || path.starts_with("api/") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    serve_file("index.html")
}

fn serve_file(path: &str) -> Response {
    match StaticAssets::get(path) {
        Some(content) => file_response(path, content.data.as_ref()),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn file_response(path: &str, content: &[u8]) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, cache_control_for_path(path))
        .body(Body::from(content.to_vec()))
        .unwrap_or_else(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create response",
            )
                .into_response()
        })
}

/// HTML is always revalidated; scripts and styles may be cached briefly.
fn cache_control_for_path(path: &str) -> &'static str {
    if Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
    {
        "no-cache, must-revalidate"
    } else {
        "public, max-age=3600"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_control_for_path() {
        assert_eq!(
            cache_control_for_path("index.html"),
            "no-cache, must-revalidate"
        );
        assert_eq!(cache_control_for_path("app.js"), "public, max-age=3600");
        assert_eq!(cache_control_for_path("styles.css"), "public, max-age=3600");
    }

    #[test]
    fn test_front_end_is_embedded() {
        assert!(StaticAssets::get("index.html").is_some());
        assert!(StaticAssets::get("app.js").is_some());
        assert!(StaticAssets::get("styles.css").is_some());
    }
}
