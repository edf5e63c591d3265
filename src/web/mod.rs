//! Web API module for yamlform.
//!
//! This module provides the browser-facing shell: a REST API that keeps one
//! [`SessionContext`] per browser session and runs a render pass for every
//! interaction, plus the embedded single-page front end.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/config` - UI settings for the front end
//! - `GET /api/templates` - List selectable template files
//! - `POST /api/sessions` - Create a session
//! - `GET /api/sessions/{id}` - Render the session's form
//! - `DELETE /api/sessions/{id}` - Drop a session
//! - `POST /api/sessions/{id}/template` - Select or upload a template
//! - `PUT /api/sessions/{id}/widgets` - Submit edited widget values
//! - `POST /api/sessions/{id}/validate` - Validate the exported YAML
//! - `POST /api/sessions/{id}/clear` - Reset the session
//! - `GET /api/sessions/{id}/export/{format}` - Download `yaml` or `csv`
//!
//! Sessions live in memory. Creating a session first drops the ones idle for
//! longer than `server.session_idle_minutes`, then the least recently used
//! ones while more than `server.max_sessions` would remain.

pub mod static_files;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::constants::{
    CSV_EXPORT_FILENAME, CSV_EXPORT_MIME, LOAD_TEMPLATE_INFO, YAML_EXPORT_FILENAME,
    YAML_EXPORT_MIME,
};
use crate::export::{self, YamlValidation};
use crate::form::{FieldView, WidgetValue};
use crate::services::{templates, TemplateService};
use crate::session::{LoadOutcome, SessionContext};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// Directory holding selectable templates
    templates_dir: PathBuf,
    /// Live editing sessions
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

/// A session plus the time it was last touched.
struct SessionEntry {
    context: SessionContext,
    last_access: Instant,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(config: Config, templates_dir: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            templates_dir,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the templates directory.
    #[must_use]
    pub fn templates_dir(&self) -> &PathBuf {
        &self.templates_dir
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, SessionEntry>>, ApiFailure> {
        self.sessions.lock().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Session store is unavailable")),
            )
        })
    }

    /// Runs `f` against one session and marks it as used.
    fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionContext) -> Result<T, ApiFailure>,
    ) -> Result<T, ApiFailure> {
        let mut sessions = self.lock_sessions()?;

        let entry = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        entry.last_access = Instant::now();

        f(&mut entry.context)
    }

    /// Drops idle sessions, then the least recently used ones until there
    /// is room for one more.
    fn prune_sessions(&self, sessions: &mut HashMap<Uuid, SessionEntry>) {
        let idle_limit =
            Duration::from_secs(self.config.server.session_idle_minutes.saturating_mul(60));
        let max_sessions = self.config.server.max_sessions.max(1);

        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() < idle_limit);
        let expired = before - sessions.len();

        let mut evicted = 0;
        if sessions.len() >= max_sessions {
            let mut by_age: Vec<(Uuid, Instant)> = sessions
                .iter()
                .map(|(id, entry)| (*id, entry.last_access))
                .collect();
            by_age.sort_by_key(|(_, last_access)| *last_access);

            let excess = sessions.len() + 1 - max_sessions;
            for (id, _) in by_age.into_iter().take(excess) {
                sessions.remove(&id);
                evicted += 1;
            }
        }

        if expired + evicted > 0 {
            info!("Dropped {expired} idle and {evicted} least recently used sessions");
        }
    }
}

fn session_not_found(id: Uuid) -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(format!("Session not found: {id}"))),
    )
}

/// Error half of every handler result.
type ApiFailure = (StatusCode, Json<ApiError>);

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// UI settings response.
#[derive(Debug, Serialize)]
pub struct UiConfigResponse {
    /// Browser page title.
    pub page_title: String,
    /// Whether to show the raw form state.
    pub show_debug: bool,
}

/// Template list response.
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// Template file names, alphabetical.
    pub templates: Vec<String>,
    /// Number of templates.
    pub count: usize,
}

/// Template selection or upload request.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TemplateRequest {
    /// Upload raw template content.
    Upload {
        /// Original file name of the upload.
        name: String,
        /// YAML text.
        content: String,
    },
    /// Pick a file from the templates directory.
    Select {
        /// Template file name.
        filename: String,
    },
}

/// Widget update request.
#[derive(Debug, Deserialize)]
pub struct WidgetUpdateRequest {
    /// Widget key to new value.
    pub values: HashMap<String, WidgetValue>,
}

/// Full view of a session after a render pass.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session identifier.
    pub session_id: Uuid,
    /// Whether a template is loaded.
    pub template_loaded: bool,
    /// Detected root wrapper key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_key: Option<String>,
    /// Template keys in original order.
    pub key_order: Vec<String>,
    /// Message from the last successful load, or the load prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Counter bumped on every clear, used to reset the upload input.
    pub uploader_key: u32,
    /// Rendered widgets.
    pub fields: Vec<FieldView>,
    /// Structured form data.
    pub data: serde_json::Value,
    /// YAML preview.
    pub preview: String,
    /// Whether the form produced any data.
    pub has_data: bool,
    /// Last validation result, if still current.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<YamlValidation>,
    /// Whether the YAML download should be offered.
    pub yaml_download_enabled: bool,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Renders `session` and builds the response body.
fn session_response(id: Uuid, session: &mut SessionContext) -> Result<SessionResponse, ApiFailure> {
    let rendered = session.render();
    let data = serde_json::to_value(&rendered.data).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::with_details(
                "Failed to encode form data",
                e.to_string(),
            )),
        )
    })?;

    let template = session.generator().template();
    let message = match template {
        Some(_) => session.message().map(str::to_string),
        None => Some(LOAD_TEMPLATE_INFO.to_string()),
    };

    Ok(SessionResponse {
        session_id: id,
        template_loaded: template.is_some(),
        root_key: template.and_then(|t| t.root_key()).map(str::to_string),
        key_order: template.map(|t| t.key_order().to_vec()).unwrap_or_default(),
        message,
        uploader_key: session.uploader_key(),
        fields: rendered.fields,
        data,
        preview: rendered.preview,
        has_data: rendered.has_data,
        validation: session.validation().cloned(),
        yaml_download_enabled: session.yaml_is_valid(),
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/config - UI settings.
async fn get_ui_config(State(state): State<AppState>) -> Json<UiConfigResponse> {
    Json(UiConfigResponse {
        page_title: state.config.ui.page_title.clone(),
        show_debug: state.config.ui.show_debug,
    })
}

/// GET /api/templates - List template files.
async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = TemplateService::list_template_files(&state.templates_dir);
    let count = templates.len();
    Json(TemplateListResponse { templates, count })
}

/// POST /api/sessions - Create a new session.
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiFailure> {
    let id = Uuid::new_v4();
    let mut session = SessionContext::new(state.config.ui.expander_expanded);
    let response = session_response(id, &mut session)?;

    let mut sessions = state.lock_sessions()?;
    state.prune_sessions(&mut sessions);
    sessions.insert(
        id,
        SessionEntry {
            context: session,
            last_access: Instant::now(),
        },
    );

    debug!("Created session {id}");
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/sessions/{id} - Render the session's form.
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiFailure> {
    state
        .with_session(id, |session| session_response(id, session))
        .map(Json)
}

/// DELETE /api/sessions/{id} - Drop a session.
async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    state
        .lock_sessions()?
        .remove(&id)
        .ok_or_else(|| session_not_found(id))?;

    debug!("Deleted session {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/{id}/template - Select or upload a template.
async fn load_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TemplateRequest>,
) -> Result<Json<SessionResponse>, ApiFailure> {
    // Read the file before taking the session lock
    let (name, content, selected) = match request {
        TemplateRequest::Upload { name, content } => (name, content, false),
        TemplateRequest::Select { filename } => {
            templates::validate_filename(&filename).map_err(|e| {
                (StatusCode::BAD_REQUEST, Json(ApiError::new(e.to_string())))
            })?;
            let content = TemplateService::load_template_file(&state.templates_dir, &filename)
                .ok_or_else(|| {
                    (
                        StatusCode::NOT_FOUND,
                        Json(ApiError::new(format!("Template not found: {filename}"))),
                    )
                })?;
            (filename, content, true)
        }
    };

    state
        .with_session(id, |session| {
            let outcome = if selected {
                session.select_template(&name, &content)
            } else {
                session.upload(&name, &content)
            };

            if outcome == LoadOutcome::Rejected {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiError::with_details(
                        "Failed to load template",
                        "The file is not valid YAML or its root is not a mapping",
                    )),
                ));
            }

            session_response(id, session)
        })
        .map(Json)
}

/// PUT /api/sessions/{id}/widgets - Submit edited widget values.
async fn update_widgets(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<WidgetUpdateRequest>,
) -> Result<Json<SessionResponse>, ApiFailure> {
    state
        .with_session(id, |session| {
            session.update_widgets(request.values);
            session_response(id, session)
        })
        .map(Json)
}

/// POST /api/sessions/{id}/validate - Validate the exported YAML.
async fn validate_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiFailure> {
    state
        .with_session(id, |session| {
            session.render();
            session.validate();
            session_response(id, session)
        })
        .map(Json)
}

/// POST /api/sessions/{id}/clear - Reset the session.
async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiFailure> {
    state
        .with_session(id, |session| {
            session.clear();
            session_response(id, session)
        })
        .map(Json)
}

/// GET /api/sessions/{id}/export/{format} - Download YAML or CSV.
async fn export_session(
    State(state): State<AppState>,
    Path((id, format)): Path<(Uuid, String)>,
) -> Result<Response, ApiFailure> {
    let data = state.with_session(id, |session| {
        if !session.render().has_data {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("Nothing to export")),
            ));
        }
        Ok(session.structured_data())
    })?;

    let (body, filename, mime) = match format.as_str() {
        "yaml" => (
            export::export_yaml(&data),
            YAML_EXPORT_FILENAME,
            YAML_EXPORT_MIME,
        ),
        "csv" => (export::export_csv(&data), CSV_EXPORT_FILENAME, CSV_EXPORT_MIME),
        other => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError::with_details(
                    "Unsupported export format",
                    format!("Expected 'yaml' or 'csv', got '{other}'"),
                )),
            ))
        }
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // The server is meant to run locally next to the browser, so any origin is allowed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api/config", get(get_ui_config))
        .route("/api/templates", get(list_templates))
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/template", post(load_template))
        .route("/api/sessions/{id}/widgets", put(update_widgets))
        .route("/api/sessions/{id}/validate", post(validate_session))
        .route("/api/sessions/{id}/clear", post(clear_session))
        .route("/api/sessions/{id}/export/{format}", get(export_session))
        // Front end
        .fallback(static_files::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the server fails to bind or stops unexpectedly.
pub async fn run_server(
    config: Config,
    templates_dir: PathBuf,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    info!("Templates directory: {}", templates_dir.display());
    let state = AppState::new(config, templates_dir);
    let app = create_router(state);

    info!("Starting yamlform web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
