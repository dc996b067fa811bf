use axum::{
    extract::{Multipart, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{error, instrument, warn};

use crate::auth::{
    dto::{LoginForm, SignupFields, UploadedFile},
    extractors::CurrentUser,
    repo_types::User,
    services, session,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::views;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_page).post(signup_submit))
        .route("/login", get(login_page).post(login_submit))
        .route("/homepage", get(homepage))
        .route("/logout", get(logout))
}

async fn signup_page() -> Html<String> {
    Html(views::signup_page(None))
}

/// Pull the signup fields out of the multipart body. A file part with an
/// empty filename counts as no upload, matching what browsers send for a
/// blank file input.
async fn collect_signup_fields(mut mp: Multipart) -> anyhow::Result<SignupFields> {
    let mut fields = SignupFields::default();
    while let Some(field) = mp.next_field().await? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "profile_pic" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let body = field.bytes().await?;
                fields.profile_pic = Some(UploadedFile { filename, body });
            }
            "first_name" => fields.first_name = field.text().await?,
            "last_name" => fields.last_name = field.text().await?,
            "username" => fields.username = field.text().await?,
            "email" => fields.email = field.text().await?,
            "password" => fields.password = field.text().await?,
            "dob" => fields.dob = field.text().await?,
            _ => {}
        }
    }
    Ok(fields)
}

#[instrument(skip(state, mp))]
async fn signup_submit(State(state): State<AppState>, mp: Multipart) -> Response {
    let fields = match collect_signup_fields(mp).await {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "malformed signup body");
            return Html(views::signup_page(Some("An error occurred. Please try again.")))
                .into_response();
        }
    };

    match services::register(&state, fields).await {
        Ok(_) => Redirect::to("/login").into_response(),
        Err(e) => {
            match &e {
                AppError::Storage(cause) => error!(error = %cause, "signup failed"),
                other => warn!(error = %other, "signup rejected"),
            }
            Html(views::signup_page(Some(&e.to_string()))).into_response()
        }
    }
}

async fn login_page() -> Html<String> {
    Html(views::login_page(None))
}

#[instrument(skip(state, form))]
async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match services::login(&state, &form.username, &form.password).await {
        Ok((_, token)) => {
            let cookie = match session::session_cookie(
                &token,
                state.config.session_ttl,
                state.config.cookie_secure,
            ) {
                Ok(c) => c,
                Err(e) => {
                    error!(error = %e, "session cookie build failed");
                    return Html(views::login_page(Some(
                        "Server error. Please try again later.",
                    )))
                    .into_response();
                }
            };
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            (headers, Redirect::to("/homepage")).into_response()
        }
        Err(AppError::Auth) => {
            Html(views::login_page(Some("Invalid username or password."))).into_response()
        }
        Err(e) => {
            error!(error = %e, "login failed");
            Html(views::login_page(Some("Server error. Please try again later.")))
                .into_response()
        }
    }
}

/// Authenticated landing page. Re-reads the user row by the session's id so
/// the rendered record is current, not the snapshot.
#[instrument(skip(state, user))]
async fn homepage(State(state): State<AppState>, user: Option<CurrentUser>) -> Response {
    let Some(CurrentUser(session_user)) = user else {
        return Redirect::to("/login").into_response();
    };

    match User::find_by_id(&state.db, session_user.id).await {
        Ok(Some(user)) => Html(views::homepage(&user)).into_response(),
        Ok(None) => {
            warn!(user_id = session_user.id, "session references missing user");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading user data.").into_response()
        }
        Err(e) => {
            error!(error = %e, user_id = session_user.id, "homepage load failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading user data.").into_response()
        }
    }
}

#[instrument(skip(state, headers))]
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session::token_from_headers(&headers) {
        if let Err(e) = session::destroy(&state.db, &token).await {
            error!(error = %e, "logout failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error logging out.").into_response();
        }
    }

    let mut response_headers = HeaderMap::new();
    // Clear the cookie even when no session record existed.
    if let Ok(cookie) = session::clear_session_cookie(state.config.cookie_secure) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (response_headers, Redirect::to("/login")).into_response()
}
