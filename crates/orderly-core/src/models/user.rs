use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("email is required")]
    EmailRequired,
    #[error("invalid email format")]
    InvalidEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    /// Build a validated user without an id. The name is trimmed and the email
    /// is trimmed and lower-cased before validation.
    pub fn new(name: &str, email: &str) -> Result<Self, UserValidationError> {
        let user = Self {
            id: String::new(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
        };
        user.validate()?;
        Ok(user)
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.is_empty() {
            return Err(UserValidationError::NameRequired);
        }
        if self.email.is_empty() {
            return Err(UserValidationError::EmailRequired);
        }
        if !EMAIL_REGEX.is_match(&self.email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(())
    }
}
