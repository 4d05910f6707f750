use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use orders_api_core::codec::Item;
use orders_api_core::keys::{KeyQuery, TableKey, ORDER_STATUS_ATTRIBUTE, PARTITION_KEY, SORT_KEY};
use serde_json::{Number, Value};

use crate::adapters::table_store::{StoreError, TableStore};
use crate::config::ApiConfig;

type AttributeMap = HashMap<String, AttributeValue>;

/// DynamoDB-backed single table.
///
/// The trait is synchronous so handlers stay runtime-agnostic; each call
/// blocks the current worker on the SDK future, which requires the
/// multi-threaded tokio runtime.
#[derive(Clone)]
pub struct DynamoDbTableStore {
    client: Client,
    table_name: String,
    status_index: String,
}

impl std::fmt::Debug for DynamoDbTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbTableStore")
            .field("table_name", &self.table_name)
            .field("status_index", &self.status_index)
            .finish()
    }
}

impl DynamoDbTableStore {
    pub fn new(
        client: Client,
        table_name: impl Into<String>,
        status_index: impl Into<String>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            status_index: status_index.into(),
        }
    }

    /// Builds the client from the shared SDK config, applying the endpoint
    /// override when one is configured (e.g. DynamoDB Local).
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, config: &ApiConfig) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self::new(
            Client::from_conf(builder.build()),
            config.table_name.clone(),
            config.status_index.clone(),
        )
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
    }
}

impl TableStore for DynamoDbTableStore {
    fn get_item(&self, key: &TableKey) -> Result<Option<Item>, StoreError> {
        let response = Self::block_on(
            self.client
                .get_item()
                .table_name(&self.table_name)
                .set_key(Some(key_attributes(key)))
                .send(),
        )
        .map_err(|error| sdk_error("GetItem", error))?;

        response
            .item()
            .map(|attributes| item_from_attributes("GetItem", attributes))
            .transpose()
    }

    fn put_item(&self, item: Item) -> Result<(), StoreError> {
        if !item.contains_key(PARTITION_KEY) || !item.contains_key(SORT_KEY) {
            return Err(StoreError::new("PutItem", "item is missing pk or sk"));
        }

        Self::block_on(
            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(attributes_from_item(&item)))
                .send(),
        )
        .map(|_| ())
        .map_err(|error| sdk_error("PutItem", error))
    }

    fn update_item(&self, key: &TableKey, attributes: Item) -> Result<(), StoreError> {
        let update = SetExpression::build(&attributes)?;

        Self::block_on(
            self.client
                .update_item()
                .table_name(&self.table_name)
                .set_key(Some(key_attributes(key)))
                .update_expression(update.expression)
                .set_expression_attribute_names(Some(update.names))
                .set_expression_attribute_values(Some(update.values))
                .send(),
        )
        .map(|_| ())
        .map_err(|error| sdk_error("UpdateItem", error))
    }

    fn delete_item(&self, key: &TableKey) -> Result<(), StoreError> {
        Self::block_on(
            self.client
                .delete_item()
                .table_name(&self.table_name)
                .set_key(Some(key_attributes(key)))
                .send(),
        )
        .map(|_| ())
        .map_err(|error| sdk_error("DeleteItem", error))
    }

    fn query(&self, query: &KeyQuery) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut exclusive_start_key: Option<AttributeMap> = None;

        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table_name)
                .expression_attribute_names("#pk", PARTITION_KEY)
                .expression_attribute_values(
                    ":pk",
                    AttributeValue::S(query.partition_key().to_string()),
                );

            request = match query {
                KeyQuery::Partition { .. } => request.key_condition_expression("#pk = :pk"),
                KeyQuery::OrderStatus { status, .. } => request
                    .index_name(&self.status_index)
                    .key_condition_expression("#st = :st AND #pk = :pk")
                    .expression_attribute_names("#st", ORDER_STATUS_ATTRIBUTE)
                    .expression_attribute_values(
                        ":st",
                        AttributeValue::S(status.as_str().to_string()),
                    ),
            };

            if let Some(key) = exclusive_start_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response =
                Self::block_on(request.send()).map_err(|error| sdk_error("Query", error))?;

            for attributes in response.items() {
                items.push(item_from_attributes("Query", attributes)?);
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(items)
    }
}

/// A `SET` update expression with every attribute name and value bound to a
/// placeholder, so reserved words such as `items` need no special casing.
#[derive(Debug, Clone, PartialEq)]
struct SetExpression {
    expression: String,
    names: HashMap<String, String>,
    values: AttributeMap,
}

impl SetExpression {
    fn build(attributes: &Item) -> Result<Self, StoreError> {
        if attributes.is_empty() {
            return Err(StoreError::new("UpdateItem", "no attributes to update"));
        }

        let mut clauses = Vec::with_capacity(attributes.len());
        let mut names = HashMap::with_capacity(attributes.len());
        let mut values = HashMap::with_capacity(attributes.len());

        for (index, (name, value)) in attributes.iter().enumerate() {
            if name == PARTITION_KEY || name == SORT_KEY {
                return Err(StoreError::new(
                    "UpdateItem",
                    "key attributes cannot be updated",
                ));
            }
            let name_placeholder = format!("#a{index}");
            let value_placeholder = format!(":v{index}");
            clauses.push(format!("{name_placeholder} = {value_placeholder}"));
            names.insert(name_placeholder, name.clone());
            values.insert(value_placeholder, attribute_from_json(value));
        }

        Ok(Self {
            expression: format!("SET {}", clauses.join(", ")),
            names,
            values,
        })
    }
}

fn key_attributes(key: &TableKey) -> AttributeMap {
    HashMap::from([
        (PARTITION_KEY.to_string(), AttributeValue::S(key.pk.clone())),
        (SORT_KEY.to_string(), AttributeValue::S(key.sk.clone())),
    ])
}

fn sdk_error(operation: &'static str, error: impl std::error::Error) -> StoreError {
    StoreError::new(operation, DisplayErrorContext(error).to_string())
}

pub fn attributes_from_item(item: &Item) -> AttributeMap {
    item.iter()
        .map(|(name, value)| (name.clone(), attribute_from_json(value)))
        .collect()
}

pub fn item_from_attributes(
    operation: &'static str,
    attributes: &AttributeMap,
) -> Result<Item, StoreError> {
    attributes
        .iter()
        .map(|(name, attribute)| Ok((name.clone(), json_from_attribute(operation, attribute)?)))
        .collect()
}

pub fn attribute_from_json(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(attribute_from_json).collect()),
        Value::Object(map) => AttributeValue::M(attributes_from_item(map)),
    }
}

pub fn json_from_attribute(
    operation: &'static str,
    attribute: &AttributeValue,
) -> Result<Value, StoreError> {
    match attribute {
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::N(raw) => parse_number(operation, raw),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(values) => values
            .iter()
            .map(|value| json_from_attribute(operation, value))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => item_from_attributes(operation, map).map(Value::Object),
        other => Err(StoreError::new(
            operation,
            format!("unsupported attribute type in stored item: {other:?}"),
        )),
    }
}

fn parse_number(operation: &'static str, raw: &str) -> Result<Value, StoreError> {
    if let Ok(integer) = raw.parse::<i64>() {
        return Ok(Value::from(integer));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::new(operation, format!("invalid number attribute '{raw}'")))
}
