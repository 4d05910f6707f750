//! Mapping between API records and the items stored in the single table.
//!
//! Stored items carry `pk`, `sk` and the declared attributes only. Username and
//! order id are never stored as plain attributes; they are recovered from the
//! keys when an item is projected back into a response.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::keys::{
    order_id_from_sort_key, order_key, user_key, username_from_order_partition,
    username_from_user_key, TableKey, PARTITION_KEY, SORT_KEY,
};
use crate::model::{Address, Order, OrderItem, OrderPayload, OrderStatus, User};

pub type Item = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("stored item has unexpected key layout (pk={pk}, sk={sk})")]
    UnexpectedKey { pk: String, sk: String },
    #[error("stored item could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("user {0} has no address to copy onto the order")]
    MissingAddress(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    pk: String,
    sk: String,
    full_name: String,
    email: String,
    addresses: Vec<Address>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOrder {
    pk: String,
    sk: String,
    order_status: OrderStatus,
    items: Vec<OrderItem>,
    full_name: String,
    address: Address,
}

pub fn new_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds an order from a validated payload, copying name and first address
/// from `owner` as they are right now.
pub fn snapshot_order(
    payload: OrderPayload,
    order_id: String,
    owner: &User,
) -> Result<Order, RecordError> {
    let address = owner
        .primary_address()
        .cloned()
        .ok_or_else(|| RecordError::MissingAddress(owner.username.clone()))?;

    Ok(Order {
        id: order_id,
        username: owner.username.clone(),
        order_status: payload.order_status,
        items: payload.items,
        full_name: owner.full_name.clone(),
        address,
    })
}

pub fn to_stored_user(user: &User) -> Item {
    let key = user_key(&user.username);
    with_key(&key, user_update_attributes(user))
}

pub fn to_stored_order(order: &Order) -> Item {
    let key = order_key(&order.username, &order.id);
    with_key(&key, order_update_attributes(order))
}

/// Attributes a user PUT overwrites.
pub fn user_update_attributes(user: &User) -> Item {
    into_item(json!({
        "fullName": user.full_name,
        "email": user.email,
        "addresses": user.addresses,
    }))
}

/// Attributes an order PUT overwrites.
pub fn order_update_attributes(order: &Order) -> Item {
    into_item(json!({
        "orderStatus": order.order_status,
        "items": order.items,
        "fullName": order.full_name,
        "address": order.address,
    }))
}

pub fn user_from_item(item: &Item) -> Result<User, RecordError> {
    let stored: StoredUser = serde_json::from_value(Value::Object(item.clone()))?;
    let key = TableKey::new(stored.pk, stored.sk);
    let username = username_from_user_key(&key)
        .ok_or_else(|| unexpected_key(&key))?
        .to_string();

    Ok(User {
        username,
        full_name: stored.full_name,
        email: stored.email,
        addresses: stored.addresses,
    })
}

pub fn order_from_item(item: &Item) -> Result<Order, RecordError> {
    let stored: StoredOrder = serde_json::from_value(Value::Object(item.clone()))?;
    let key = TableKey::new(stored.pk, stored.sk);
    let (Some(username), Some(order_id)) = (
        username_from_order_partition(&key.pk),
        order_id_from_sort_key(&key.sk),
    ) else {
        return Err(unexpected_key(&key));
    };

    Ok(Order {
        id: order_id.to_string(),
        username: username.to_string(),
        order_status: stored.order_status,
        items: stored.items,
        full_name: stored.full_name,
        address: stored.address,
    })
}

pub fn key_of(item: &Item) -> Option<TableKey> {
    let pk = item.get(PARTITION_KEY)?.as_str()?;
    let sk = item.get(SORT_KEY)?.as_str()?;
    Some(TableKey::new(pk, sk))
}

fn with_key(key: &TableKey, attributes: Item) -> Item {
    let mut item = Item::new();
    item.insert(PARTITION_KEY.to_string(), Value::from(key.pk.clone()));
    item.insert(SORT_KEY.to_string(), Value::from(key.sk.clone()));
    item.extend(attributes);
    item
}

fn into_item(value: Value) -> Item {
    match value {
        Value::Object(map) => map,
        _ => Item::new(),
    }
}

fn unexpected_key(key: &TableKey) -> RecordError {
    RecordError::UnexpectedKey {
        pk: key.pk.clone(),
        sk: key.sk.clone(),
    }
}
