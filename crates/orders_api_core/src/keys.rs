use serde::{Deserialize, Serialize};

use crate::model::OrderStatus;

pub const PARTITION_KEY: &str = "pk";
pub const SORT_KEY: &str = "sk";
pub const ORDER_STATUS_ATTRIBUTE: &str = "orderStatus";
pub const DEFAULT_ORDER_STATUS_INDEX: &str = "orderStatusIdx";

/// Every user profile lives in this one partition so a single query lists them.
pub const USER_PARTITION: &str = "USER#";
const PROFILE_PREFIX: &str = "PROFILE#";
const ORDER_PREFIX: &str = "ORDER#";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableKey {
    pub pk: String,
    pub sk: String,
}

impl TableKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// Range queries the access-pattern layer issues against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery {
    /// Every item in one partition of the base table.
    Partition { pk: String },
    /// Items of one partition carrying the given status, served by the status index.
    OrderStatus { pk: String, status: OrderStatus },
}

impl KeyQuery {
    pub fn partition_key(&self) -> &str {
        match self {
            Self::Partition { pk } | Self::OrderStatus { pk, .. } => pk,
        }
    }
}

pub fn user_sort_key(username: &str) -> String {
    format!("{PROFILE_PREFIX}{username}")
}

pub fn user_key(username: &str) -> TableKey {
    TableKey::new(USER_PARTITION, user_sort_key(username))
}

pub fn order_partition(username: &str) -> String {
    format!("{ORDER_PREFIX}{username}")
}

pub fn order_sort_key(order_id: &str) -> String {
    format!("{ORDER_PREFIX}{order_id}")
}

pub fn order_key(username: &str, order_id: &str) -> TableKey {
    TableKey::new(order_partition(username), order_sort_key(order_id))
}

pub fn users_query() -> KeyQuery {
    KeyQuery::Partition {
        pk: USER_PARTITION.to_string(),
    }
}

pub fn orders_query(username: &str) -> KeyQuery {
    KeyQuery::Partition {
        pk: order_partition(username),
    }
}

pub fn orders_by_status_query(username: &str, status: OrderStatus) -> KeyQuery {
    KeyQuery::OrderStatus {
        pk: order_partition(username),
        status,
    }
}

pub fn username_from_user_key(key: &TableKey) -> Option<&str> {
    if key.pk != USER_PARTITION {
        return None;
    }
    key.sk.strip_prefix(PROFILE_PREFIX)
}

pub fn username_from_order_partition(pk: &str) -> Option<&str> {
    pk.strip_prefix(ORDER_PREFIX)
}

pub fn order_id_from_sort_key(sk: &str) -> Option<&str> {
    sk.strip_prefix(ORDER_PREFIX)
}
