use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::model::{OrderPayload, UserPayload};

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_FULL_NAME_CHARS: usize = 3;
pub const MIN_HOME_CHARS: usize = 10;
pub const MIN_ITEM_NAME_CHARS: usize = 1;
pub const MIN_ITEM_VALUE: f64 = 0.1;
pub const MIN_ITEM_QUANTITY: u32 = 1;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.-]+@[a-zA-Z0-9-]+.[a-zA-Z0-9-.]+$")
        .expect("email pattern should compile")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn parse_user_payload(body: Option<&str>) -> Result<UserPayload, ValidationError> {
    let payload = parse_body::<UserPayload>(body)?;
    validate_user_payload(&payload)?;
    Ok(payload)
}

pub fn parse_order_payload(body: Option<&str>) -> Result<OrderPayload, ValidationError> {
    let payload = parse_body::<OrderPayload>(body)?;
    validate_order_payload(&payload)?;
    Ok(payload)
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    require_min_chars("username", username, MIN_USERNAME_CHARS)
}

pub fn validate_user_payload(payload: &UserPayload) -> Result<(), ValidationError> {
    require_min_chars("fullName", &payload.full_name, MIN_FULL_NAME_CHARS)?;

    if !EMAIL_PATTERN.is_match(&payload.email) {
        return Err(ValidationError::new(format!(
            "email '{}' is not a valid address",
            payload.email
        )));
    }

    if payload.addresses.is_empty() {
        return Err(ValidationError::new(
            "addresses must contain at least 1 item",
        ));
    }
    for (index, address) in payload.addresses.iter().enumerate() {
        require_min_chars(
            &format!("addresses[{index}].home"),
            &address.home,
            MIN_HOME_CHARS,
        )?;
    }

    Ok(())
}

pub fn validate_order_payload(payload: &OrderPayload) -> Result<(), ValidationError> {
    if payload.items.is_empty() {
        return Err(ValidationError::new("items must contain at least 1 item"));
    }

    for (index, item) in payload.items.iter().enumerate() {
        require_min_chars(&format!("items[{index}].name"), &item.name, MIN_ITEM_NAME_CHARS)?;
        if !item.value.is_finite() || item.value < MIN_ITEM_VALUE {
            return Err(ValidationError::new(format!(
                "items[{index}].value must be >= {MIN_ITEM_VALUE}"
            )));
        }
        if item.quantity < MIN_ITEM_QUANTITY {
            return Err(ValidationError::new(format!(
                "items[{index}].quantity must be >= {MIN_ITEM_QUANTITY}"
            )));
        }
    }

    Ok(())
}

fn parse_body<T: DeserializeOwned>(body: Option<&str>) -> Result<T, ValidationError> {
    let text = match body {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ValidationError::new("Request body is required")),
    };

    serde_json::from_str(text)
        .map_err(|error| ValidationError::new(format!("Malformed request: {error}")))
}

fn require_min_chars(field: &str, value: &str, min_chars: usize) -> Result<(), ValidationError> {
    if value.chars().count() < min_chars {
        return Err(ValidationError::new(format!(
            "{field} must be at least {min_chars} characters"
        )));
    }
    Ok(())
}
