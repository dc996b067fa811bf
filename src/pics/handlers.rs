use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{error, instrument};

use crate::auth::extractors::CurrentUser;
use crate::state::AppState;

pub fn pic_routes() -> Router<AppState> {
    Router::new().route("/profile-pic/:filename", get(profile_pic))
}

fn mime_for(filename: &str) -> &'static str {
    match std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Serve a stored upload to any logged-in user. The extractor rejects
/// sessionless requests with a 403 before this body runs; the filename is
/// trusted as stored, since sanitization happened when the name was derived
/// at signup.
#[instrument(skip(state, _user))]
async fn profile_pic(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(filename): Path<String>,
) -> Response {
    match state.uploads.get(&filename).await {
        Ok(Some(bytes)) => ([(CONTENT_TYPE, mime_for(&filename))], bytes).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Image not found").into_response(),
        Err(e) => {
            error!(error = %e, %filename, "upload read failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading image").into_response()
        }
    }
}
