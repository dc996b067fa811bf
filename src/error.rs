use thiserror::Error;

/// Per-request failure taxonomy. Every variant carries a user-visible
/// message; none of them are fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unusable request input. Nothing has been written yet.
    #[error("{0}")]
    Validation(&'static str),

    /// Unique-constraint collision on signup. The message deliberately does
    /// not say which field collided.
    #[error("Username or email might already exist.")]
    Duplicate,

    /// Filesystem or database failure. Details go to the log, the user gets
    /// a generic message.
    #[error("An error occurred. Please try again.")]
    Storage(anyhow::Error),

    /// Bad credentials. Unknown username and wrong password produce the same
    /// message so usernames cannot be enumerated.
    #[error("Invalid username or password.")]
    Auth,

    /// Guarded route hit without an active session.
    #[error("Unauthorized")]
    Authorization,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message_names_no_field() {
        assert_eq!(
            AppError::Duplicate.to_string(),
            "Username or email might already exist."
        );
    }

    #[test]
    fn auth_message_is_undifferentiated() {
        assert_eq!(AppError::Auth.to_string(), "Invalid username or password.");
    }

    #[test]
    fn storage_hides_the_cause_from_the_user() {
        let err = AppError::Storage(anyhow::anyhow!("disk full at /uploads"));
        assert_eq!(err.to_string(), "An error occurred. Please try again.");
    }
}
