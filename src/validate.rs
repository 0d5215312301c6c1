//! Form input validation.
//!
//! Raw form fields (untyped strings, possibly absent) are checked together
//! and either become a sanitized typed payload or a set of field-keyed
//! error messages. Nothing here touches storage or sessions; validation
//! always runs before any side effect.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Email grammar: one `@`, no whitespace, a dot somewhere in the domain.
/// Deliberately permissive; uniqueness is what actually matters.
static EMAIL_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Field-keyed validation messages, one per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: &'static str, message: String) {
        self.0.insert(field, message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Raw registration form. Fields are optional so an absent field becomes a
/// validation message instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Sanitized registration payload: trimmed name, normalized email.
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Raw login form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Sanitized login payload.
#[derive(Debug, Clone)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Validate a registration form: name ≥ 5 chars, valid email, password ≥ 6
/// chars. All fields are checked; every invalid one gets a message.
pub fn register_form(form: &RegisterForm) -> Result<RegisterData, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = form.name.as_deref().unwrap_or("").trim().to_string();
    if name.chars().count() < 5 {
        errors.insert("name", "Name must be at least 5 characters".to_string());
    }

    let email = normalize_email(form.email.as_deref().unwrap_or(""));
    if !EMAIL_RE.is_match(&email) {
        errors.insert("email", "Email is not valid".to_string());
    }

    let password = form.password.clone().unwrap_or_default();
    if password.chars().count() < 6 {
        errors.insert(
            "password",
            "Password must be at least 6 characters".to_string(),
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RegisterData {
        name,
        email,
        password,
    })
}

/// Validate a login form: valid email, non-empty password (no minimum
/// beyond presence).
pub fn login_form(form: &LoginForm) -> Result<LoginData, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let email = normalize_email(form.email.as_deref().unwrap_or(""));
    if !EMAIL_RE.is_match(&email) {
        errors.insert("email", "Email is not valid".to_string());
    }

    let password = form.password.clone().unwrap_or_default();
    if password.is_empty() {
        errors.insert("password", "Password is required".to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(LoginData { email, password })
}

/// Emails are compared case-insensitively for uniqueness, so normalize to
/// lowercase at the validation boundary.
fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
