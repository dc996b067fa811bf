//! Inline HTML page renderers.
//!
//! Each page takes an optional message that gets rendered as a banner above
//! the form, so a failed submission re-renders the same page with feedback.

use crate::auth::repo_types::User;

fn base_style() -> &'static str {
    r#"
    body { font-family: system-ui, sans-serif; background: #eef1f5; color: #222;
           display: flex; justify-content: center; padding: 48px 16px; }
    .panel { background: #fff; border-radius: 8px; padding: 28px;
             max-width: 420px; width: 100%; box-shadow: 0 2px 12px rgba(0,0,0,0.1); }
    h1 { font-size: 22px; margin: 0 0 18px; }
    label { display: block; font-size: 13px; margin: 12px 0 4px; color: #555; }
    input { width: 100%; padding: 9px 10px; border: 1px solid #ccc;
            border-radius: 5px; font-size: 15px; box-sizing: border-box; }
    button { margin-top: 18px; width: 100%; padding: 11px; border: none;
             border-radius: 5px; background: #2a6f4e; color: #fff;
             font-size: 15px; cursor: pointer; }
    button:hover { background: #22593f; }
    .message { background: #fdecea; color: #b3261e; padding: 9px 12px;
               border-radius: 5px; font-size: 13px; margin-bottom: 14px; }
    .alt { margin-top: 14px; font-size: 13px; text-align: center; }
    .alt a { color: #2a6f4e; }
    dl { font-size: 14px; } dt { color: #777; margin-top: 10px; }
    dd { margin: 2px 0 0; }
    img.avatar { max-width: 160px; border-radius: 8px; margin-top: 12px; }
    "#
}

/// Minimal HTML escaping for user-supplied values.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn message_banner(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<div class="message">{}</div>"#, escape(m)))
        .unwrap_or_default()
}

pub fn signup_page(message: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Snapbook - Sign Up</title>
<style>{style}</style>
</head><body>
<div class="panel">
  <h1>Create your account</h1>
  {banner}
  <form method="POST" action="/signup" enctype="multipart/form-data">
    <label>First name</label><input type="text" name="first_name" required>
    <label>Last name</label><input type="text" name="last_name" required>
    <label>Username</label><input type="text" name="username" required autocomplete="username">
    <label>Email</label><input type="text" name="email" required>
    <label>Password</label><input type="password" name="password" required autocomplete="new-password">
    <label>Date of birth</label><input type="date" name="dob" required>
    <label>Profile picture</label><input type="file" name="profile_pic" accept="image/*">
    <button type="submit">Sign up</button>
  </form>
  <div class="alt">Already have an account? <a href="/login">Log in</a></div>
</div>
</body></html>"#,
        style = base_style(),
        banner = message_banner(message),
    )
}

pub fn login_page(message: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Snapbook - Log In</title>
<style>{style}</style>
</head><body>
<div class="panel">
  <h1>Log in</h1>
  {banner}
  <form method="POST" action="/login">
    <label>Username</label><input type="text" name="username" required autocomplete="username">
    <label>Password</label><input type="password" name="password" required autocomplete="current-password">
    <button type="submit">Log in</button>
  </form>
  <div class="alt">No account yet? <a href="/signup">Sign up</a></div>
</div>
</body></html>"#,
        style = base_style(),
        banner = message_banner(message),
    )
}

pub fn homepage(user: &User) -> String {
    let picture = user
        .profile_pic
        .as_deref()
        .map(|pic| {
            format!(
                r#"<img class="avatar" src="/profile-pic/{}" alt="profile picture">"#,
                escape(pic)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Snapbook - Home</title>
<style>{style}</style>
</head><body>
<div class="panel">
  <h1>Welcome, {first_name}!</h1>
  {picture}
  <dl>
    <dt>Username</dt><dd>{username}</dd>
    <dt>Name</dt><dd>{first_name} {last_name}</dd>
    <dt>Email</dt><dd>{email}</dd>
    <dt>Date of birth</dt><dd>{dob}</dd>
  </dl>
  <div class="alt"><a href="/logout">Log out</a></div>
</div>
</body></html>"#,
        style = base_style(),
        first_name = escape(&user.first_name),
        last_name = escape(&user.last_name),
        username = escape(&user.username),
        email = escape(&user.email),
        dob = escape(&user.dob),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "Alice".into(),
            last_name: "Miller".into(),
            email: "alice@example.com".into(),
            dob: "1990-04-01".into(),
            profile_pic: Some("alice_1.png".into()),
        }
    }

    #[test]
    fn failed_submission_renders_the_banner() {
        let html = signup_page(Some("Please upload a profile picture."));
        assert!(html.contains("Please upload a profile picture."));
        assert!(!signup_page(None).contains(r#"<div class="message">"#));
    }

    #[test]
    fn homepage_shows_first_name_and_picture_reference() {
        let html = homepage(&sample_user());
        assert!(html.contains("Welcome, Alice!"));
        assert!(html.contains("/profile-pic/alice_1.png"));
        assert!(!html.contains("$argon2id$"));
    }

    #[test]
    fn user_values_are_escaped() {
        let mut user = sample_user();
        user.first_name = "<script>x</script>".into();
        let html = homepage(&user);
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
