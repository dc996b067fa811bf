use serde::Serialize;
use sqlx::FromRow;

/// User record in the database. Created once at signup, read at login and on
/// every authenticated page load, never updated or deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dob: String,
    /// Derived storage name of the uploaded profile picture.
    pub profile_pic: Option<String>,
}

/// Field set for inserting a new user row.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub dob: &'a str,
    pub profile_pic: &'a str,
}
