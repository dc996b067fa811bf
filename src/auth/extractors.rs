use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::error;

use crate::auth::{dto::SessionUser, session};
use crate::state::AppState;

/// Resolves the session cookie into the stored identity snapshot.
///
/// Rejection is a bare 403: guarded resources leak nothing about whether the
/// resource exists. Handlers that prefer a redirect take `Option<CurrentUser>`
/// instead.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session::token_from_headers(&parts.headers)
            .ok_or((StatusCode::FORBIDDEN, "Unauthorized"))?;

        match session::resolve(&state.db, &token).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err((StatusCode::FORBIDDEN, "Unauthorized")),
            Err(e) => {
                error!(error = %e, "session lookup failed");
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Server error"))
            }
        }
    }
}
