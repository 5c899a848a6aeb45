// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTTP shell for the listing editor

pub mod layout;
pub mod pages;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, Request, State},
    http::{header, StatusCode, Uri},
    middleware::{self, Next},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::form::{render_field_state, EditorState, FieldEvent};
use crate::page::{active_section, SectionBounds, Viewport};
use crate::photos::{IncomingFile, PhotoIntake, PhotoUpdate, RoomType};
use crate::routes::{self, RouteDecision, EDITOR_PATH, LOGIN_PATH, PHOTOS_PATH};
use crate::EditorError;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<Catalog>,
    pub auth: Mutex<AuthSession>,
    pub editor: Mutex<EditorState>,
    pub photos: Mutex<PhotoIntake>,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Catalog, auth: AuthSession) -> Self {
        let editor = EditorState::new(config.editor.multiselect_default_max);
        Self {
            config,
            catalog: Arc::new(catalog),
            auth: Mutex::new(auth),
            editor: Mutex::new(editor),
            photos: Mutex::new(PhotoIntake::new()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.auth).is_authenticated()
    }
}

// Every request holds a lock for its whole turn; a poisoned lock still guards
// consistent data since no handler panics midway through a mutation.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.photos.max_upload_bytes;

    let guarded = Router::new()
        // Pages
        .route("/", get(root))
        .route(EDITOR_PATH, get(editor_page))
        .route(PHOTOS_PATH, get(photos_page))
        .route("/photos/preview/:id", get(photo_preview))
        // API endpoints
        .route("/api/photos", post(api_add_photos).layer(DefaultBodyLimit::max(upload_limit)))
        .route("/api/photos/:id", post(api_update_photo))
        .route("/api/photos/:id/delete", post(api_delete_photo))
        .route("/api/fields/:section/:name", post(api_field_event))
        .route("/api/editor/active-section", post(api_active_section))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login_submit))
        .route("/logout", post(logout))
        .merge(guarded)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let authenticated = state.is_authenticated();
    match routes::guard(request.uri().path(), authenticated) {
        Some(target) => {
            debug!("Unauthenticated request for {}, redirecting", request.uri().path());
            Redirect::to(&target).into_response()
        }
        None => next.run(request).await,
    }
}

impl IntoResponse for EditorError {
    fn into_response(self) -> Response {
        match self {
            EditorError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("Not found: {}", what)).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

fn redirect(decision: RouteDecision) -> Redirect {
    match decision {
        RouteDecision::Redirect(target) => Redirect::to(&target),
        RouteDecision::Render(_) => Redirect::to("/"),
    }
}

// === Page Handlers ===

#[derive(Deserialize)]
struct LoginQuery {
    from: Option<String>,
}

async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(pages::render_login_page(query.from.as_deref()))
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    from: Option<String>,
}

async fn login_submit(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Redirect {
    lock(&state.auth).grant();
    debug!("Login accepted for '{}'", form.username);
    Redirect::to(&routes::return_path(form.from.as_deref()))
}

async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    lock(&state.auth).revoke();
    lock(&state.editor).clear();
    lock(&state.photos).clear();
    info!("Editor session discarded");
    Redirect::to(LOGIN_PATH)
}

async fn root() -> Redirect {
    redirect(routes::resolve("/", true))
}

async fn fallback(State(state): State<Arc<AppState>>, uri: Uri) -> Redirect {
    redirect(routes::resolve(uri.path(), state.is_authenticated()))
}

async fn editor_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let editor = lock(&state.editor);
    Html(pages::render_editor_page(&state.catalog, &*editor, &state.config.editor))
}

#[derive(Deserialize)]
struct PhotosQuery {
    upload: Option<String>,
}

async fn photos_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PhotosQuery>,
) -> Html<String> {
    let show_upload = matches!(query.upload.as_deref(), Some("1") | Some("true"));
    let photos = lock(&state.photos);
    Html(pages::render_photos_page(
        &photos,
        show_upload,
        &state.config.editor,
        state.catalog.required_count(),
    ))
}

async fn photo_preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, EditorError> {
    let preview = lock(&state.photos)
        .previews()
        .get(&id)
        .ok_or_else(|| EditorError::NotFound(format!("preview {}", id)))?;

    Ok(([(header::CONTENT_TYPE, preview.mime)], preview.bytes.to_vec()).into_response())
}

// === API Handlers ===

async fn api_add_photos(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Redirect, EditorError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EditorError::Server(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let name = field.file_name().unwrap_or("photo").to_string();
        let mime = field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| EditorError::Server(format!("Failed to read {}: {}", name, e)))?;
        files.push(IncomingFile {
            name,
            mime,
            bytes: bytes.to_vec(),
        });
    }

    let added = lock(&state.photos).add(files);
    debug!("Upload added {} photos", added.len());
    Ok(Redirect::to(PHOTOS_PATH))
}

#[derive(Deserialize)]
struct PhotoForm {
    room_type: Option<String>,
    description: Option<String>,
}

async fn api_update_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Form(form): Form<PhotoForm>,
) -> Result<StatusCode, EditorError> {
    let mut updates = Vec::new();
    if let Some(room) = form.room_type {
        let room_type = if room.is_empty() {
            None
        } else {
            match RoomType::parse(&room) {
                Some(room_type) => Some(room_type),
                None => return Ok(StatusCode::UNPROCESSABLE_ENTITY),
            }
        };
        updates.push(PhotoUpdate::RoomType(room_type));
    }
    if let Some(description) = form.description {
        updates.push(PhotoUpdate::Description(description));
    }

    let mut photos = lock(&state.photos);
    if photos.get(&id).is_none() {
        return Err(EditorError::NotFound(format!("photo {}", id)));
    }
    for update in updates {
        photos.update(&id, update);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn api_delete_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, EditorError> {
    if lock(&state.photos).remove(&id) {
        Ok(Redirect::to(PHOTOS_PATH))
    } else {
        Err(EditorError::NotFound(format!("photo {}", id)))
    }
}

async fn api_field_event(
    State(state): State<Arc<AppState>>,
    Path((section_id, name)): Path<(String, String)>,
    Json(event): Json<FieldEvent>,
) -> Result<Html<String>, EditorError> {
    let (section, field) = state
        .catalog
        .field(&section_id, &name)
        .ok_or_else(|| {
            EditorError::NotFound(format!("field '{}' in section '{}'", name, section_id))
        })?;

    let mut editor = lock(&state.editor);
    let field_state = editor.apply(section, field, event);
    Ok(Html(render_field_state(field, field_state)))
}

#[derive(Deserialize)]
struct ActiveSectionRequest {
    sections: Vec<SectionBounds>,
    viewport: Viewport,
}

#[derive(Serialize)]
struct ActiveSectionResponse {
    active: Option<String>,
}

async fn api_active_section(
    Json(request): Json<ActiveSectionRequest>,
) -> Json<ActiveSectionResponse> {
    let active = active_section(&request.sections, &request.viewport).map(str::to_string);
    Json(ActiveSectionResponse { active })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

/// Start the web server and run until Ctrl+C or SIGTERM
pub async fn start_server(
    config: AppConfig,
    catalog: Catalog,
    auth: AuthSession,
) -> crate::Result<()> {
    let addr = format!("{}:{}", config.web.host, config.web.port);
    let state = Arc::new(AppState::new(config, catalog, auth));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listing editor available at http://{}", addr);

    let router = create_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| EditorError::Server(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request as HttpRequest;
    use tower::ServiceExt;

    fn app_state(signed_in: bool) -> Arc<AppState> {
        let mut auth = AuthSession::load(Box::new(MemoryStore::new()));
        if signed_in {
            auth.grant();
        }
        let catalog = Catalog::builtin().unwrap();
        Arc::new(AppState::new(AppConfig::default(), catalog, auth))
    }

    async fn send(state: &Arc<AppState>, request: HttpRequest<Body>) -> Response {
        create_router(state.clone()).oneshot(request).await.unwrap()
    }

    fn get(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn upload_request(files: &[(&str, &str, &[u8])]) -> HttpRequest<Body> {
        let boundary = "listing-editor-test-boundary";
        let mut body = Vec::new();
        for (name, mime, bytes) in files {
            body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            let disposition = format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                name
            );
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", mime).as_bytes());
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        HttpRequest::builder()
            .method("POST")
            .uri("/api/photos")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_guarded_page_redirects_to_login() {
        let state = app_state(false);
        let response = send(&state, get("/editor")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?from=/editor");
    }

    #[tokio::test]
    async fn test_login_page_is_public() {
        let state = app_state(false);
        let response = send(&state, get("/login?from=/photos")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"id="login-form""#));
        assert!(html.contains(r#"name="from" value="/photos""#));
    }

    #[tokio::test]
    async fn test_login_honors_from_then_page_renders() {
        let state = app_state(false);
        let body = "username=agent&password=x&from=%2Fphotos";
        let response = send(&state, post_form("/login", body)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/photos");
        assert!(state.is_authenticated());

        let response = send(&state, get("/photos")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(r#"id="photos-main-content""#));
    }

    #[tokio::test]
    async fn test_login_rejects_external_from() {
        let state = app_state(false);
        let response = send(
            &state,
            post_form("/login", "username=a&from=https%3A%2F%2Fevil.example"),
        )
        .await;
        assert_eq!(location(&response), "/editor");
    }

    #[tokio::test]
    async fn test_login_with_control_characters_in_from_falls_back() {
        let state = app_state(false);
        for from in ["%0A", "%2Fphotos%0Aevil", "%2F%09%2Fevil.example", "%2Fa%0D%0AX-Evil%3A+1"] {
            let body = format!("username=a&from={}", from);
            let response = send(&state, post_form("/login", &body)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", from);
            assert_eq!(location(&response), "/editor", "{}", from);
        }
        assert!(state.is_authenticated());
    }

    #[tokio::test]
    async fn test_root_and_unknown_paths_redirect() {
        let state = app_state(true);
        assert_eq!(location(&send(&state, get("/")).await), "/editor");
        assert_eq!(location(&send(&state, get("/does/not/exist")).await), "/");
    }

    #[tokio::test]
    async fn test_editor_page_renders_catalog() {
        let state = app_state(true);
        let response = send(&state, get("/editor")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"id="editor-main-content""#));
        assert!(html.contains(r#"id="tab-editor""#));
        for section in state.catalog.sections() {
            assert!(html.contains(&format!(r#"id="sidebar-link-{}""#, section.id)));
        }
    }

    #[tokio::test]
    async fn test_field_event_updates_and_rerenders() {
        let state = app_state(true);
        let (section, field) = state
            .catalog
            .sections()
            .iter()
            .flat_map(|s| s.fields().map(move |f| (s, f)))
            .find(|(_, f)| f.tag() == "date")
            .unwrap();
        let uri = format!("/api/fields/{}/{}", section.id, field.name);

        let event = r#"{ "action": "pick_date", "value": "2024-03-07" }"#;
        let response = send(&state, post_json(&uri, event)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(r#"value="03/07/2024""#));

        let page = body_text(send(&state, get("/editor")).await).await;
        assert!(page.contains(r#"value="03/07/2024""#));
    }

    #[tokio::test]
    async fn test_field_event_for_unknown_field_is_404() {
        let state = app_state(true);
        let event = r#"{ "action": "input", "value": "x" }"#;
        let response = send(&state, post_json("/api/fields/nowhere/nothing", event)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_active_section_endpoint() {
        let state = app_state(true);
        let body = r#"{
            "sections": [
                { "id": "a", "top": 0, "height": 400 },
                { "id": "b", "top": 400, "height": 400 }
            ],
            "viewport": { "scroll_top": 300, "height": 400 }
        }"#;
        let response = send(&state, post_json("/api/editor/active-section", body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"active":"b"}"#);
    }

    #[tokio::test]
    async fn test_photo_upload_preview_and_delete() {
        let state = app_state(true);
        let files: [(&str, &str, &[u8]); 2] = [
            ("front.jpg", "image/jpeg", b"jpeg-bytes"),
            ("back.png", "image/png", b"png"),
        ];
        let response = send(&state, upload_request(&files)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/photos");

        let (photo_id, preview_url) = {
            let photos = lock(&state.photos);
            assert_eq!(photos.len(), 2);
            assert_eq!(photos.photos()[0].name, "front.jpg");
            (photos.photos()[0].id, photos.photos()[0].preview_url())
        };

        let response = send(&state, get(&preview_url)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
        assert_eq!(body_text(response).await, "jpeg-bytes");

        let delete = format!("/api/photos/{}/delete", photo_id);
        let response = send(&state, post_form(&delete, "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(lock(&state.photos).len(), 1);

        let response = send(&state, get(&preview_url)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_photo_metadata_update() {
        let state = app_state(true);
        let ids = lock(&state.photos).add(vec![IncomingFile {
            name: "k.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![1],
        }]);
        let uri = format!("/api/photos/{}", ids[0]);

        let response = send(&state, post_form(&uri, "room_type=Kitchen&description=Bright")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        {
            let photos = lock(&state.photos);
            let photo = photos.get(&ids[0]).unwrap();
            assert_eq!(photo.room_type, Some(RoomType::Kitchen));
            assert_eq!(photo.description, "Bright");
        }

        let response = send(&state, post_form(&uri, "room_type=Sunroom")).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = format!("/api/photos/{}", Uuid::new_v4());
        let response = send(&state, post_form(&missing, "description=x")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logout_tears_down_session() {
        let state = app_state(true);
        lock(&state.photos).add(vec![IncomingFile {
            name: "a.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![1, 2],
        }]);
        let registry = lock(&state.photos).previews().clone();

        let response = send(&state, post_form("/logout", "")).await;
        assert_eq!(location(&response), "/login");
        assert!(!state.is_authenticated());
        assert!(lock(&state.photos).is_empty());
        assert_eq!(registry.live_count(), 0);

        let response = send(&state, get("/photos")).await;
        assert_eq!(location(&response), "/login?from=/photos");
    }
}
