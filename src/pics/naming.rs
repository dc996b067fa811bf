use std::path::Path;

use time::OffsetDateTime;

/// Strip everything but ASCII alphanumerics so the username can never smuggle
/// path separators or dots into the storage name.
pub fn sanitize_username(username: &str) -> String {
    username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Derive the collision-resistant storage name for an upload:
/// `{sanitized_username}_{nanos}.{ext}`. The extension comes from the
/// client-supplied filename; a nameless extension is simply omitted.
pub fn upload_name(username: &str, original_filename: &str) -> String {
    let stem = sanitize_username(username);
    let ts = OffsetDateTime::now_utc().unix_timestamp_nanos();
    match Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) => format!("{stem}_{ts}.{ext}"),
        None => format!("{stem}_{ts}"),
    }
}
