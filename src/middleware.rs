//! Request middleware: the route gate and security headers.

use crate::auth::middleware::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Route classes the gate distinguishes, by path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// `/login` and `/register`: only meaningful when signed out.
    Auth,
    /// `/dashboard`: only meaningful when signed in.
    Protected,
    /// Everything else passes through regardless of session state.
    Open,
}

impl RouteClass {
    pub fn of(path: &str) -> RouteClass {
        if path.starts_with("/login") || path.starts_with("/register") {
            RouteClass::Auth
        } else if path.starts_with("/dashboard") {
            RouteClass::Protected
        } else {
            RouteClass::Open
        }
    }
}

/// Paths the gate never evaluates: API routes, static assets, favicon.
fn is_exempt(path: &str) -> bool {
    path.starts_with("/api") || path.starts_with("/static") || path == "/favicon.ico"
}

/// Route gate middleware.
///
/// Stateless per request: it consults only the current request's session
/// presence, so the same request always yields the same decision.
///
/// | route class | session | action                  |
/// |-------------|---------|-------------------------|
/// | Auth        | yes     | redirect to `/dashboard`|
/// | Auth        | no      | pass through            |
/// | Protected   | yes     | pass through            |
/// | Protected   | no      | redirect to `/login`    |
/// | Open        | either  | pass through            |
pub async fn route_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if is_exempt(path) {
        return next.run(request).await;
    }

    let class = RouteClass::of(path);
    if class == RouteClass::Open {
        return next.run(request).await;
    }

    let session = match state.issuer.current_session(request.headers()).await {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    match (class, session.is_some()) {
        (RouteClass::Auth, true) => Redirect::to("/dashboard").into_response(),
        (RouteClass::Protected, false) => Redirect::to("/login").into_response(),
        _ => next.run(request).await,
    }
}

/// Middleware that adds security headers to all responses.
///
/// The CSP is strict same-origin: these pages carry no third-party
/// resources, and `form-action 'self'` keeps the credential forms from
/// posting anywhere else.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             object-src 'none'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    response
}
