use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub home: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub addresses: Vec<Address>,
}

impl User {
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Pending,
    Finished,
}

impl OrderStatus {
    pub const ALL: [Self; 3] = [Self::Created, Self::Pending, Self::Finished];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Pending => "PENDING",
            Self::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "orderStatus must be one of CREATED, PENDING, FINISHED (got '{value}')"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub value: f64,
    pub quantity: u32,
}

/// An order as returned to callers.
///
/// `full_name` and `address` are copied from the owning user when the order is
/// written. Later profile edits do not reach orders that already exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub username: String,
    pub order_status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub full_name: String,
    pub address: Address,
}

/// Body accepted by user POST/PUT. The username always comes from the path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub full_name: String,
    pub email: String,
    pub addresses: Vec<Address>,
}

impl UserPayload {
    pub fn into_user(self, username: &str) -> User {
        User {
            username: username.to_string(),
            full_name: self.full_name,
            email: self.email,
            addresses: self.addresses,
        }
    }
}

/// Body accepted by order POST/PUT. Identity and snapshot fields are never
/// taken from the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_status: OrderStatus,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn order_status_uses_upper_case_wire_names() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Finished).expect("status should serialize"),
            json!("FINISHED")
        );
        assert_eq!("PENDING".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
    }

    #[test]
    fn order_status_rejects_unknown_and_lower_case_values() {
        let error = "created"
            .parse::<OrderStatus>()
            .expect_err("lower case should fail");
        assert!(error.message().contains("got 'created'"));
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn user_payload_ignores_body_username() {
        let payload: UserPayload = serde_json::from_value(json!({
            "username": "mallory",
            "fullName": "Alice A",
            "email": "a@b.com",
            "addresses": [{"home": "123 Main Street"}],
        }))
        .expect("payload should parse");

        let user = payload.into_user("alice");
        assert_eq!(user.username, "alice");
        assert_eq!(
            user.primary_address().map(|address| address.home.as_str()),
            Some("123 Main Street")
        );
    }

    #[test]
    fn order_serializes_camel_case_fields() {
        let order = Order {
            id: "o-1".to_string(),
            username: "alice".to_string(),
            order_status: OrderStatus::Created,
            items: vec![OrderItem {
                name: "Widget".to_string(),
                value: 9.99,
                quantity: 2,
            }],
            full_name: "Alice A".to_string(),
            address: Address {
                home: "123 Main Street".to_string(),
            },
        };

        let value = serde_json::to_value(&order).expect("order should serialize");
        assert_eq!(value["orderStatus"], json!("CREATED"));
        assert_eq!(value["fullName"], json!("Alice A"));
        assert_eq!(value["items"][0]["quantity"], json!(2));
    }
}
