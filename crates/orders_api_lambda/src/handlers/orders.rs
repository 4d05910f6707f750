//! Order access patterns. Every operation first loads the owning user; a
//! missing user ends the request before any order key is read or written.

use orders_api_core::codec::{
    new_order_id, order_from_item, order_update_attributes, snapshot_order, to_stored_order,
};
use orders_api_core::keys::{order_key, orders_by_status_query, orders_query, KeyQuery};
use orders_api_core::model::{Order, OrderStatus};
use orders_api_core::validation::parse_order_payload;

use crate::adapters::table_store::TableStore;
use crate::handlers::users::require_user;
use crate::handlers::{message_response, success_response, ApiGatewayResponse, RequestError};

const COMPONENT: &str = "orders_handler";

pub fn list_orders(
    store: &dyn TableStore,
    username: &str,
) -> Result<ApiGatewayResponse, RequestError> {
    require_user(store, username)?;
    let orders = query_orders(store, &orders_query(username))?;
    success_response(200, &orders)
}

pub fn list_orders_by_status(
    store: &dyn TableStore,
    username: &str,
    status: &str,
) -> Result<ApiGatewayResponse, RequestError> {
    require_user(store, username)?;
    // No stored order can carry a status outside the enum, so nothing matches.
    let Ok(status) = status.parse::<OrderStatus>() else {
        return success_response(200, &Vec::<Order>::new());
    };
    let orders = query_orders(store, &orders_by_status_query(username, status))?;
    success_response(200, &orders)
}

pub fn get_order(
    store: &dyn TableStore,
    username: &str,
    order_id: &str,
) -> Result<ApiGatewayResponse, RequestError> {
    require_user(store, username)?;
    let order = require_order(store, username, order_id)?;
    success_response(200, &order)
}

pub fn create_order(
    store: &dyn TableStore,
    username: &str,
    body: Option<&str>,
) -> Result<ApiGatewayResponse, RequestError> {
    let owner = require_user(store, username)?;
    let payload = parse_order_payload(body)?;
    let order = snapshot_order(payload, new_order_id(), &owner)?;

    store.put_item(to_stored_order(&order))?;
    tracing::info!(
        component = COMPONENT,
        event = "order_created",
        username,
        order_id = %order.id,
        order_status = %order.order_status,
    );

    success_response(201, &order)
}

pub fn update_order(
    store: &dyn TableStore,
    username: &str,
    order_id: &str,
    body: Option<&str>,
) -> Result<ApiGatewayResponse, RequestError> {
    let owner = require_user(store, username)?;
    require_order(store, username, order_id)?;
    let payload = parse_order_payload(body)?;
    let order = snapshot_order(payload, order_id.to_string(), &owner)?;

    store.update_item(
        &order_key(&order.username, &order.id),
        order_update_attributes(&order),
    )?;
    tracing::info!(
        component = COMPONENT,
        event = "order_updated",
        username,
        order_id,
        order_status = %order.order_status,
    );

    success_response(200, &order)
}

pub fn delete_order(
    store: &dyn TableStore,
    username: &str,
    order_id: &str,
) -> Result<ApiGatewayResponse, RequestError> {
    require_user(store, username)?;
    require_order(store, username, order_id)?;

    store.delete_item(&order_key(username, order_id))?;
    tracing::info!(component = COMPONENT, event = "order_deleted", username, order_id);

    message_response(
        200,
        format!("Order with id {order_id} from user {username} was deleted"),
    )
}

fn require_order(
    store: &dyn TableStore,
    username: &str,
    order_id: &str,
) -> Result<Order, RequestError> {
    let item = store
        .get_item(&order_key(username, order_id))?
        .ok_or_else(|| RequestError::order_not_found(order_id))?;
    Ok(order_from_item(&item)?)
}

fn query_orders(store: &dyn TableStore, query: &KeyQuery) -> Result<Vec<Order>, RequestError> {
    store
        .query(query)?
        .iter()
        .map(|item| order_from_item(item).map_err(RequestError::from))
        .collect()
}
