//! Pages: home, login and register forms, dashboard.
//!
//! Markup is minimal server-rendered HTML; session-derived values are
//! escaped before interpolation.

use crate::auth::middleware::{CurrentSession, RequireSession};
use axum::{extract::Query, response::Html};
use serde::Deserialize;

/// GET / — links depend on session presence.
pub async fn home(CurrentSession(session): CurrentSession) -> Html<String> {
    let nav = match &session {
        Some(session) => format!(
            r#"<p>Signed in as {}.</p><p><a href="/dashboard">Go to dashboard</a></p>"#,
            escape_html(&session.name)
        ),
        None => r#"<p><a href="/login">Login</a> or <a href="/register">Register</a></p>"#
            .to_string(),
    };
    Html(page("Home", &format!("<h1>Welcome</h1>{nav}")))
}

/// GET /dashboard — requires a session; the extractor redirects otherwise.
pub async fn dashboard(RequireSession(session): RequireSession) -> Html<String> {
    let body = format!(
        r#"<h1>Dashboard</h1>
<ul>
  <li>Name: {}</li>
  <li>Email: {}</li>
  <li>Id: {}</li>
</ul>
<form method="post" action="/logout"><button type="submit">Sign out</button></form>"#,
        escape_html(&session.name),
        escape_html(&session.email),
        escape_html(&session.user_id),
    );
    Html(page("Dashboard", &body))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /login — the login form, with a notice when redirected back after a
/// credential mismatch.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = if query.error.as_deref() == Some("invalid") {
        r#"<p class="error">Invalid email or password.</p>"#
    } else {
        ""
    };
    let body = format!(
        r#"<h1>Login</h1>{notice}
<form method="post" action="/login">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Login</button>
</form>
<p>No account? <a href="/register">Register</a></p>"#
    );
    Html(page("Login", &body))
}

/// GET /register — the registration form.
pub async fn register_page() -> Html<String> {
    let body = r#"<h1>Register</h1>
<form method="post" action="/register">
  <label>Name <input type="text" name="name" required></label>
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Login</a></p>"#;
    Html(page("Register", body))
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
{body}
</body>
</html>"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"a&b"</b>"#),
            "&lt;b&gt;&quot;a&amp;b&quot;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Alice Smith"), "Alice Smith");
    }

    #[tokio::test]
    async fn test_login_page_error_notice() {
        let with_error = login_page(Query(LoginQuery {
            error: Some("invalid".to_string()),
        }))
        .await;
        assert!(with_error.0.contains("Invalid email or password"));

        let without = login_page(Query(LoginQuery::default())).await;
        assert!(!without.0.contains("Invalid email or password"));
    }
}
