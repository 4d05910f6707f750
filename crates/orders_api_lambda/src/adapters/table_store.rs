use orders_api_core::codec::Item;
use orders_api_core::keys::{KeyQuery, TableKey};

/// A failed store round-trip. Handlers treat it as opaque and fatal to the
/// request; nothing retries it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct StoreError {
    pub operation: &'static str,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Key-value operations over the single table.
///
/// A lookup that finds nothing is `Ok(None)`, never an error.
pub trait TableStore {
    fn get_item(&self, key: &TableKey) -> Result<Option<Item>, StoreError>;

    /// Writes a full item, replacing any item with the same key. The item must
    /// carry its `pk` and `sk` attributes.
    fn put_item(&self, item: Item) -> Result<(), StoreError>;

    /// Overwrites the named attributes of the item at `key`.
    fn update_item(&self, key: &TableKey, attributes: Item) -> Result<(), StoreError>;

    fn delete_item(&self, key: &TableKey) -> Result<(), StoreError>;

    /// Returns every matching item. Order is not part of the contract.
    fn query(&self, query: &KeyQuery) -> Result<Vec<Item>, StoreError>;
}
