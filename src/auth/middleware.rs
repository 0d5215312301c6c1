//! Shared application state and session extractors.
//!
//! Session context is explicit everywhere: handlers receive it through
//! these extractors, never through a hidden global.

use crate::auth::issuer::SessionIssuer;
use crate::config::Config;
use crate::models::StoredSession;
use crate::storage::UserStore;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub issuer: Arc<dyn SessionIssuer>,
    pub config: Arc<Config>,
}

/// Required session extractor.
///
/// Redirects to the login page when the request carries no session. Used by
/// pages that only make sense when signed in; the route gate normally gets
/// there first, this is the handler-level re-check.
pub struct RequireSession(pub StoredSession);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.issuer.current_session(&parts.headers).await {
            Ok(Some(session)) => Ok(RequireSession(session)),
            Ok(None) => Err(Redirect::to("/login").into_response()),
            Err(err) => Err(err.into_response()),
        }
    }
}

/// Optional session extractor.
///
/// `None` when the request carries no session; lookup failures still
/// surface as errors rather than masquerading as "signed out".
pub struct CurrentSession(pub Option<StoredSession>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.issuer.current_session(&parts.headers).await {
            Ok(session) => Ok(CurrentSession(session)),
            Err(err) => Err(err.into_response()),
        }
    }
}
