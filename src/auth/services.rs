use tracing::{info, warn};

use crate::auth::dto::{SessionUser, SignupFields};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{NewUser, User};
use crate::auth::session;
use crate::error::AppError;
use crate::pics::naming;
use crate::state::AppState;

/// Signup pipeline. Preconditions run in order: upload present, asset
/// persisted, password hashed, row inserted. A missing upload aborts before
/// any side effect; an insert failure after the asset write leaves an
/// orphaned file, which is logged and accepted.
pub async fn register(state: &AppState, fields: SignupFields) -> Result<i64, AppError> {
    let Some(upload) = fields.profile_pic else {
        return Err(AppError::Validation("Please upload a profile picture."));
    };

    let stored_name = naming::upload_name(&fields.username, &upload.filename);
    state
        .uploads
        .put(&stored_name, upload.body)
        .await
        .map_err(AppError::Storage)?;

    let password_hash = hash_password(&fields.password).map_err(AppError::Storage)?;

    let result = User::create(
        &state.db,
        &NewUser {
            username: &fields.username,
            password_hash: &password_hash,
            first_name: &fields.first_name,
            last_name: &fields.last_name,
            email: &fields.email,
            dob: &fields.dob,
            profile_pic: &stored_name,
        },
    )
    .await;

    match result {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            Ok(user.id)
        }
        Err(e) => {
            // The asset is already on disk; the row never landed.
            warn!(file = %stored_name, "user insert failed; uploaded asset orphaned");
            Err(e)
        }
    }
}

/// Credential check plus session issuance. Unknown username and wrong
/// password are indistinguishable to the caller.
pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<(SessionUser, String), AppError> {
    let user = User::find_by_username(&state.db, username)
        .await
        .map_err(AppError::Storage)?
        .ok_or(AppError::Auth)?;

    if !verify_password(password, &user.password_hash).map_err(AppError::Storage)? {
        return Err(AppError::Auth);
    }

    let snapshot = SessionUser {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        profile_pic: user.profile_pic,
    };
    let token = session::issue(&state.db, &snapshot, state.config.session_ttl)
        .await
        .map_err(AppError::Storage)?;

    info!(user_id = snapshot.id, username = %snapshot.username, "user logged in");
    Ok((snapshot, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::dto::{SignupFields, UploadedFile};
    use bytes::Bytes;

    fn alice_fields() -> SignupFields {
        SignupFields {
            first_name: "Alice".into(),
            last_name: "Miller".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "pw123".into(),
            dob: "1990-04-01".into(),
            profile_pic: Some(UploadedFile {
                filename: "a.png".into(),
                body: Bytes::from_static(b"png-bytes"),
            }),
        }
    }

    async fn user_count(db: &sqlx::SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn signup_without_upload_creates_nothing() {
        let state = AppState::for_tests("svc-noupload").await;
        let mut fields = alice_fields();
        fields.profile_pic = None;

        let err = register(&state, fields).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Please upload a profile picture.");
        assert_eq!(user_count(&state.db).await, 0);
    }

    #[tokio::test]
    async fn duplicate_signup_loses_exactly_once() {
        let state = AppState::for_tests("svc-dup").await;
        register(&state, alice_fields()).await.unwrap();

        let err = register(&state, alice_fields()).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate));
        assert_eq!(user_count(&state.db).await, 1);
    }

    #[tokio::test]
    async fn stored_password_is_hashed_not_plaintext() {
        let state = AppState::for_tests("svc-hash").await;
        register(&state, alice_fields()).await.unwrap();
        let user = User::find_by_username(&state.db, "alice")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "pw123");
        assert!(verify_password("pw123", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn login_failure_message_is_the_same_for_both_causes() {
        let state = AppState::for_tests("svc-enum").await;
        register(&state, alice_fields()).await.unwrap();

        let wrong_pw = login(&state, "alice", "nope").await.unwrap_err();
        let no_user = login(&state, "mallory", "nope").await.unwrap_err();
        assert_eq!(wrong_pw.to_string(), no_user.to_string());
        assert!(matches!(wrong_pw, AppError::Auth));
        assert!(matches!(no_user, AppError::Auth));
    }

    #[tokio::test]
    async fn signup_login_homepage_logout_end_to_end() {
        let state = AppState::for_tests("svc-e2e").await;

        // signup: row created, asset stored under alice_<ts>.png
        let user_id = register(&state, alice_fields()).await.unwrap();
        let user = User::find_by_id(&state.db, user_id).await.unwrap().unwrap();
        let pic = user.profile_pic.clone().expect("asset reference stored");
        assert!(pic.starts_with("alice_") && pic.ends_with(".png"));
        assert!(state.uploads.get(&pic).await.unwrap().is_some());

        // login: session snapshot carries id, username, first name, pic
        let (snapshot, token) = login(&state, "alice", "pw123").await.unwrap();
        assert_eq!(snapshot.id, user_id);
        assert_eq!(snapshot.first_name, "Alice");
        assert_eq!(snapshot.profile_pic.as_deref(), Some(pic.as_str()));

        // homepage would resolve the token back to the same identity
        let resolved = session::resolve(&state.db, &token).await.unwrap().unwrap();
        assert_eq!(resolved, snapshot);

        // logout: token is dead afterwards
        session::destroy(&state.db, &token).await.unwrap();
        assert!(session::resolve(&state.db, &token).await.unwrap().is_none());
    }
}
