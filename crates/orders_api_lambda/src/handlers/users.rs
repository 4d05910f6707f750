use orders_api_core::codec::{to_stored_user, user_from_item, user_update_attributes};
use orders_api_core::keys::{user_key, users_query};
use orders_api_core::model::User;
use orders_api_core::validation::{parse_user_payload, validate_username};

use crate::adapters::table_store::TableStore;
use crate::handlers::{message_response, success_response, ApiGatewayResponse, RequestError};

const COMPONENT: &str = "users_handler";

pub fn list_users(store: &dyn TableStore) -> Result<ApiGatewayResponse, RequestError> {
    let users = store
        .query(&users_query())?
        .iter()
        .map(user_from_item)
        .collect::<Result<Vec<_>, _>>()?;

    success_response(200, &users)
}

pub fn get_user(
    store: &dyn TableStore,
    username: &str,
) -> Result<ApiGatewayResponse, RequestError> {
    let user = require_user(store, username)?;
    success_response(200, &user)
}

/// Writes the profile unconditionally; an existing user with the same name is
/// replaced.
pub fn create_user(
    store: &dyn TableStore,
    username: &str,
    body: Option<&str>,
) -> Result<ApiGatewayResponse, RequestError> {
    validate_username(username)?;
    let user = parse_user_payload(body)?.into_user(username);

    store.put_item(to_stored_user(&user))?;
    tracing::info!(component = COMPONENT, event = "user_created", username);

    success_response(201, &user)
}

pub fn update_user(
    store: &dyn TableStore,
    username: &str,
    body: Option<&str>,
) -> Result<ApiGatewayResponse, RequestError> {
    let existing = require_user(store, username)?;
    let user = parse_user_payload(body)?.into_user(&existing.username);

    store.update_item(&user_key(&user.username), user_update_attributes(&user))?;
    tracing::info!(component = COMPONENT, event = "user_updated", username);

    success_response(200, &user)
}

pub fn delete_user(
    store: &dyn TableStore,
    username: &str,
) -> Result<ApiGatewayResponse, RequestError> {
    require_user(store, username)?;

    store.delete_item(&user_key(username))?;
    tracing::info!(component = COMPONENT, event = "user_deleted", username);

    message_response(200, format!("User {username} deleted successfully."))
}

pub fn find_user(store: &dyn TableStore, username: &str) -> Result<Option<User>, RequestError> {
    let Some(item) = store.get_item(&user_key(username))? else {
        return Ok(None);
    };
    Ok(Some(user_from_item(&item)?))
}

pub fn require_user(store: &dyn TableStore, username: &str) -> Result<User, RequestError> {
    find_user(store, username)?.ok_or_else(|| RequestError::user_not_found(username))
}
