use bytes::Bytes;
use serde::Deserialize;

/// Identity snapshot held server-side for the lifetime of a session. The
/// client only ever sees the opaque token, never this payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub profile_pic: Option<String>,
}

/// Form body for login submission.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Uploaded profile picture as received from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename, used only to recover the extension.
    pub filename: String,
    pub body: Bytes,
}

/// Signup fields collected from the multipart form. Text fields are stored
/// as opaque strings; only the upload is validated.
#[derive(Debug, Default)]
pub struct SignupFields {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub dob: String,
    pub profile_pic: Option<UploadedFile>,
}
