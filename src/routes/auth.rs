//! Auth actions: register, login, logout.
//!
//! Every successful path ends in a redirect; the only values these
//! handlers return to callers are error responses.

use crate::auth::middleware::AppState;
use crate::auth::password::hash_password;
use crate::auth::session::{clear_session_cookie, extract_session_token, session_cookie};
use crate::error::AppError;
use crate::models::{Credentials, NewUser};
use crate::validate::{self, LoginForm, RegisterForm};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    Form,
};

/// POST /register — create an account, then sign straight in.
///
/// Validation and the uniqueness check fail before any mutation. The
/// auto-login step runs after the user record is committed; if it fails,
/// the record stays persisted and the caller gets `AutoLoginFailed`. Not a
/// transaction — the user can always log in manually afterwards.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let data = validate::register_form(&form).map_err(AppError::Validation)?;

    if state.users.find_by_email(&data.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&data.password)?;
    let user = state
        .users
        .create(NewUser {
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash,
        })
        .await?;

    tracing::info!(action = "user_registered", user_id = %user.id, email = %user.email, "New user registered");

    // Re-authenticate with the plaintext credentials rather than trusting
    // the record we just wrote: the same code path as a normal login.
    let session = match state
        .issuer
        .sign_in(&Credentials {
            email: data.email,
            password: data.password,
        })
        .await
    {
        Ok(session) => session,
        Err(AppError::Credentials) => {
            tracing::error!(action = "auto_login_failed", user_id = %user.id, "Post-registration sign-in rejected");
            return Err(AppError::AutoLoginFailed);
        }
        Err(other) => return Err(other),
    };

    let cookie = cookie_header(&state, &session.token)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
}

/// POST /login — check credentials and issue a session.
///
/// A credential mismatch is the one soft failure: it redirects back to the
/// login form with `?error=invalid` so the user can retype. Everything
/// else propagates.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let data = validate::login_form(&form).map_err(AppError::Validation)?;

    let session = match state
        .issuer
        .sign_in(&Credentials {
            email: data.email,
            password: data.password,
        })
        .await
    {
        Ok(session) => session,
        Err(AppError::Credentials) => {
            return Ok(Redirect::to("/login?error=invalid").into_response());
        }
        Err(other) => return Err(other),
    };

    let cookie = cookie_header(&state, &session.token)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
}

/// POST /logout — destroy the current session.
///
/// The cookie is cleared even when the request carried no session.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = extract_session_token(&headers) {
        state.issuer.sign_out(&token).await?;
        tracing::info!(action = "logout", "User logged out");
    }

    let cookie = clear_session_cookie(&state.config)
        .map_err(|e| AppError::Internal(format!("Cookie header: {}", e)))?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}

fn cookie_header(state: &AppState, token: &str) -> Result<HeaderValue, AppError> {
    session_cookie(&state.config, token)
        .map_err(|e| AppError::Internal(format!("Cookie header: {}", e)))
}
