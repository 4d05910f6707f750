use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use orders_api_core::codec::{key_of, Item};
use orders_api_core::keys::{KeyQuery, TableKey, ORDER_STATUS_ATTRIBUTE, PARTITION_KEY, SORT_KEY};
use serde_json::Value;

use crate::adapters::table_store::{StoreError, TableStore};

/// Process-local table used by tests and local runs. Mirrors the DynamoDB
/// semantics the handlers rely on, including the order status index.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    items: Mutex<BTreeMap<TableKey, Item>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics if the table mutex is poisoned.
    pub fn len(&self) -> usize {
        self.inspect().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<TableKey> {
        self.inspect().keys().cloned().collect()
    }

    fn inspect(&self) -> MutexGuard<'_, BTreeMap<TableKey, Item>> {
        self.items.lock().expect("in-memory table mutex poisoned")
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<TableKey, Item>>, StoreError> {
        self.items
            .lock()
            .map_err(|_| StoreError::new("Lock", "in-memory table mutex poisoned"))
    }
}

impl TableStore for InMemoryTableStore {
    fn get_item(&self, key: &TableKey) -> Result<Option<Item>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put_item(&self, item: Item) -> Result<(), StoreError> {
        let key = key_of(&item)
            .ok_or_else(|| StoreError::new("PutItem", "item is missing pk or sk"))?;
        self.lock()?.insert(key, item);
        Ok(())
    }

    fn update_item(&self, key: &TableKey, attributes: Item) -> Result<(), StoreError> {
        if attributes.is_empty() {
            return Err(StoreError::new("UpdateItem", "no attributes to update"));
        }
        if attributes.contains_key(PARTITION_KEY) || attributes.contains_key(SORT_KEY) {
            return Err(StoreError::new("UpdateItem", "key attributes cannot be updated"));
        }

        let mut items = self.lock()?;
        // Like UpdateItem, a missing item is created from the key.
        let item = items.entry(key.clone()).or_insert_with(|| {
            let mut item = Item::new();
            item.insert(PARTITION_KEY.to_string(), Value::from(key.pk.clone()));
            item.insert(SORT_KEY.to_string(), Value::from(key.sk.clone()));
            item
        });
        item.extend(attributes);
        Ok(())
    }

    fn delete_item(&self, key: &TableKey) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn query(&self, query: &KeyQuery) -> Result<Vec<Item>, StoreError> {
        let pk = query.partition_key();
        let items = self.lock()?;
        let matches = items
            .iter()
            .filter(|(key, _)| key.pk == pk)
            .map(|(_, item)| item)
            .filter(|item| match query {
                KeyQuery::Partition { .. } => true,
                KeyQuery::OrderStatus { status, .. } => item
                    .get(ORDER_STATUS_ATTRIBUTE)
                    .and_then(Value::as_str)
                    .is_some_and(|value| value == status.as_str()),
            })
            .cloned()
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use orders_api_core::keys::{order_key, orders_by_status_query, orders_query, user_key};
    use orders_api_core::model::OrderStatus;
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            _ => panic!("test item must be an object"),
        }
    }

    fn order_item(username: &str, id: &str, status: &str) -> Item {
        let key = order_key(username, id);
        item(json!({"pk": key.pk, "sk": key.sk, "orderStatus": status}))
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let store = InMemoryTableStore::new();
        assert_eq!(store.get_item(&user_key("alice")), Ok(None));
    }

    #[test]
    fn put_overwrites_existing_item() {
        let store = InMemoryTableStore::new();
        store
            .put_item(item(json!({"pk": "USER#", "sk": "PROFILE#alice", "email": "a@b.com"})))
            .expect("put should succeed");
        store
            .put_item(item(json!({"pk": "USER#", "sk": "PROFILE#alice", "fullName": "Alice"})))
            .expect("put should succeed");

        let stored = store
            .get_item(&user_key("alice"))
            .expect("get should succeed")
            .expect("item should exist");
        assert_eq!(stored.get("email"), None);
        assert_eq!(stored["fullName"], json!("Alice"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_rejects_item_without_keys() {
        let store = InMemoryTableStore::new();
        let error = store
            .put_item(item(json!({"pk": "USER#"})))
            .expect_err("missing sort key should fail");
        assert_eq!(error.operation, "PutItem");
    }

    #[test]
    fn update_merges_attributes_and_keeps_others() {
        let store = InMemoryTableStore::new();
        store
            .put_item(item(
                json!({"pk": "USER#", "sk": "PROFILE#alice", "email": "a@b.com", "fullName": "Alice"}),
            ))
            .expect("put should succeed");
        store
            .update_item(&user_key("alice"), item(json!({"fullName": "Alice B"})))
            .expect("update should succeed");

        let stored = store
            .get_item(&user_key("alice"))
            .expect("get should succeed")
            .expect("item should exist");
        assert_eq!(stored["fullName"], json!("Alice B"));
        assert_eq!(stored["email"], json!("a@b.com"));
    }

    #[test]
    fn update_rejects_key_attributes() {
        let store = InMemoryTableStore::new();
        let error = store
            .update_item(&user_key("alice"), item(json!({"sk": "PROFILE#bob"})))
            .expect_err("key update should fail");
        assert_eq!(error.operation, "UpdateItem");
        assert!(store.is_empty());
    }

    #[test]
    fn query_is_scoped_to_partition() {
        let store = InMemoryTableStore::new();
        for (username, id) in [("alice", "1"), ("alice", "2"), ("alicea", "3"), ("bob", "4")] {
            store
                .put_item(order_item(username, id, "CREATED"))
                .expect("put should succeed");
        }

        let items = store
            .query(&orders_query("alice"))
            .expect("query should succeed");
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item["pk"] == json!("ORDER#alice")));
    }

    #[test]
    fn status_query_filters_on_index_attribute() {
        let store = InMemoryTableStore::new();
        store
            .put_item(order_item("alice", "1", "CREATED"))
            .expect("put should succeed");
        store
            .put_item(order_item("alice", "2", "PENDING"))
            .expect("put should succeed");
        store
            .put_item(order_item("bob", "3", "PENDING"))
            .expect("put should succeed");

        let items = store
            .query(&orders_by_status_query("alice", OrderStatus::Pending))
            .expect("query should succeed");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["sk"], json!("ORDER#2"));
    }

    #[test]
    fn delete_of_missing_item_is_not_an_error() {
        let store = InMemoryTableStore::new();
        store
            .delete_item(&order_key("alice", "missing"))
            .expect("delete should succeed");
        assert!(store.keys().is_empty());
    }

    #[test]
    #[should_panic(expected = "in-memory table mutex poisoned")]
    fn inspection_panics_on_poisoned_table() {
        let store = InMemoryTableStore::new();
        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let _guard = store.items.lock();
                panic!("writer crashed while holding the table");
            });
            assert!(writer.join().is_err());
        });

        assert!(store.get_item(&user_key("alice")).is_err());
        let _ = store.len();
    }
}
