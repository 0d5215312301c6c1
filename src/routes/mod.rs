//! Route handlers: auth actions and pages.

pub mod auth;
pub mod pages;

use crate::auth::middleware::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/dashboard", get(pages::dashboard))
        .route("/login", get(pages::login_page).post(auth::login))
        .route("/register", get(pages::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}
