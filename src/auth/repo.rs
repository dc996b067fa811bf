use sqlx::SqlitePool;

use crate::auth::repo_types::{NewUser, User};
use crate::error::AppError;

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

impl User {
    /// Find a user by exact username match.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, email, dob, profile_pic
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, email, dob, profile_pic
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user row. Username uniqueness is enforced by the store;
    /// a collision comes back as [`AppError::Duplicate`] without corrupting
    /// any state.
    pub async fn create(db: &SqlitePool, new: &NewUser<'_>) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, email, dob, profile_pic)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, username, password_hash, first_name, last_name, email, dob, profile_pic
            "#,
        )
        .bind(new.username)
        .bind(new.password_hash)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.email)
        .bind(new.dob)
        .bind(new.profile_pic)
        .fetch_one(db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(AppError::Duplicate),
            Err(e) => Err(AppError::Storage(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn sample<'a>(username: &'a str, pic: &'a str) -> NewUser<'a> {
        NewUser {
            username,
            password_hash: "$argon2id$fake",
            first_name: "Alice",
            last_name: "Miller",
            email: "alice@example.com",
            dob: "1990-04-01",
            profile_pic: pic,
        }
    }

    #[tokio::test]
    async fn create_assigns_an_id_and_find_by_username_round_trips() {
        let state = AppState::for_tests("repo-create").await;
        let created = User::create(&state.db, &sample("alice", "alice_1.png"))
            .await
            .unwrap();
        assert!(created.id > 0);

        let found = User::find_by_username(&state.db, "alice")
            .await
            .unwrap()
            .expect("alice exists");
        assert_eq!(found.id, created.id);
        assert_eq!(found.profile_pic.as_deref(), Some("alice_1.png"));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_duplicate_error_not_a_second_row() {
        let state = AppState::for_tests("repo-dup").await;
        User::create(&state.db, &sample("bob", "bob_1.png"))
            .await
            .unwrap();

        let err = User::create(&state.db, &sample("bob", "bob_2.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind("bob")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn username_match_is_exact() {
        let state = AppState::for_tests("repo-exact").await;
        User::create(&state.db, &sample("Carol", "carol_1.png"))
            .await
            .unwrap();
        assert!(User::find_by_username(&state.db, "carol")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn find_by_id_misses_cleanly() {
        let state = AppState::for_tests("repo-miss").await;
        assert!(User::find_by_id(&state.db, 999).await.unwrap().is_none());
    }
}
