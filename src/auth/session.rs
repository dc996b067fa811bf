//! Server-side session store.
//!
//! A session is a row keyed by the SHA-256 digest of an opaque token; the
//! raw token only ever travels in the cookie. Expiry is fixed at issuance
//! (no sliding renewal): a resolve past the expiry behaves exactly like an
//! unknown token.

use std::time::Duration;

use anyhow::Context;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::auth::dto::SessionUser;

pub const SESSION_COOKIE: &str = "snapbook_session";

/// New opaque session token. The raw value goes to the cookie; the database
/// only sees its hash.
fn generate_token() -> anyhow::Result<String> {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Create an Active session holding `user` with expiry = now + `ttl`.
/// Returns the raw token for the cookie.
pub async fn issue(db: &SqlitePool, user: &SessionUser, ttl: Duration) -> anyhow::Result<String> {
    issue_at(db, user, ttl, OffsetDateTime::now_utc()).await
}

async fn issue_at(
    db: &SqlitePool,
    user: &SessionUser,
    ttl: Duration,
    now: OffsetDateTime,
) -> anyhow::Result<String> {
    let token = generate_token()?;
    let expires_at = now.unix_timestamp() + ttl.as_secs() as i64;
    sqlx::query(
        r#"
        INSERT INTO sessions (token_hash, user_id, username, first_name, profile_pic, expires_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(hash_token(&token))
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.first_name)
    .bind(&user.profile_pic)
    .bind(expires_at)
    .execute(db)
    .await
    .context("insert session")?;
    Ok(token)
}

/// Dereference a token into its identity snapshot. Absent, unknown and
/// expired tokens all come back as `None`.
pub async fn resolve(db: &SqlitePool, token: &str) -> anyhow::Result<Option<SessionUser>> {
    resolve_at(db, token, OffsetDateTime::now_utc()).await
}

async fn resolve_at(
    db: &SqlitePool,
    token: &str,
    now: OffsetDateTime,
) -> anyhow::Result<Option<SessionUser>> {
    let row = sqlx::query_as::<_, (i64, String, String, Option<String>)>(
        r#"
        SELECT user_id, username, first_name, profile_pic
        FROM sessions
        WHERE token_hash = ? AND expires_at > ?
        "#,
    )
    .bind(hash_token(token))
    .bind(now.unix_timestamp())
    .fetch_optional(db)
    .await
    .context("lookup session")?;

    Ok(row.map(|(id, username, first_name, profile_pic)| SessionUser {
        id,
        username,
        first_name,
        profile_pic,
    }))
}

/// Destroy a session. Idempotent; fails only on store I/O.
pub async fn destroy(db: &SqlitePool, token: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(hash_token(token))
        .execute(db)
        .await
        .context("delete session")?;
    Ok(())
}

/// `HttpOnly` cookie carrying the raw token for the session lifetime.
pub fn session_cookie(
    token: &str,
    ttl: Duration,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = ttl.as_secs();
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Expired cookie that makes the browser drop the token.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the raw session token out of the `Cookie` header, if present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE {
            return Some(val.to_string());
        }
    }
    None
}
