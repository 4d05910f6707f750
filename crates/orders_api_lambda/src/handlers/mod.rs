//! API Gateway proxy handling: event decoding, route dispatch and response
//! shaping. Per-entity access patterns live in [`users`] and [`orders`].

pub mod orders;
pub mod users;

use std::collections::HashMap;

use orders_api_core::codec::RecordError;
use orders_api_core::routes::{Route, Service};
use orders_api_core::validation::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::table_store::{StoreError, TableStore};

const COMPONENT: &str = "api_router";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// The subset of the API Gateway proxy event the router reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequest {
    pub http_method: String,
    pub resource: String,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiGatewayRequest {
    pub fn path_parameter(&self, name: &str) -> Result<&str, RequestError> {
        self.path_parameters
            .as_ref()
            .and_then(|parameters| parameters.get(name))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                RequestError::Validation(ValidationError::new(format!(
                    "Missing path parameter '{name}'"
                )))
            })
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unsupported route: {method} {resource}")]
    UnmatchedRoute { method: String, resource: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RequestError {
    pub fn user_not_found(username: &str) -> Self {
        Self::NotFound(format!("User {username} not found"))
    }

    pub fn order_not_found(order_id: &str) -> Self {
        Self::NotFound(format!("Order with id {order_id} not found"))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::UnmatchedRoute { .. } => 400,
            Self::Store(_) | Self::Record(_) | Self::Serialization(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::UnmatchedRoute { .. } => "bad_request",
            Self::Store(_) | Self::Record(_) => "store_error",
            Self::Serialization(_) => "serialization_error",
        }
    }

    pub fn into_response(self) -> ApiGatewayResponse {
        error_response(
            self.status_code(),
            json!({
                "error": self.kind(),
                "message": self.to_string(),
            }),
        )
    }
}

/// Handles any route of the REST surface.
pub fn handle_api_event(event: Value, store: &dyn TableStore) -> ApiGatewayResponse {
    handle_event(event, store, None)
}

/// Handles user routes only; order routes are answered as unmatched.
pub fn handle_users_event(event: Value, store: &dyn TableStore) -> ApiGatewayResponse {
    handle_event(event, store, Some(Service::Users))
}

/// Handles order routes only; user routes are answered as unmatched.
pub fn handle_orders_event(event: Value, store: &dyn TableStore) -> ApiGatewayResponse {
    handle_event(event, store, Some(Service::Orders))
}

fn handle_event(event: Value, store: &dyn TableStore, service: Option<Service>) -> ApiGatewayResponse {
    let request = match serde_json::from_value::<ApiGatewayRequest>(event) {
        Ok(value) => value,
        Err(error) => {
            let error = RequestError::from(ValidationError::new(format!(
                "Malformed request event: {error}"
            )));
            log_failure(None, &error);
            return error.into_response();
        }
    };

    let route = match resolve_route(&request, service) {
        Ok(route) => route,
        Err(error) => {
            log_failure(None, &error);
            return error.into_response();
        }
    };

    match dispatch(route, &request, store) {
        Ok(response) => {
            tracing::debug!(
                component = COMPONENT,
                event = "request_completed",
                route = route.name(),
                status_code = response.status_code,
            );
            response
        }
        Err(error) => {
            log_failure(Some(route), &error);
            error.into_response()
        }
    }
}

pub fn resolve_route(
    request: &ApiGatewayRequest,
    service: Option<Service>,
) -> Result<Route, RequestError> {
    Route::resolve_raw(&request.http_method, &request.resource)
        .filter(|route| service.map_or(true, |owner| route.service() == owner))
        .ok_or_else(|| RequestError::UnmatchedRoute {
            method: request.http_method.clone(),
            resource: request.resource.clone(),
        })
}

pub fn dispatch(
    route: Route,
    request: &ApiGatewayRequest,
    store: &dyn TableStore,
) -> Result<ApiGatewayResponse, RequestError> {
    match route {
        Route::ListUsers => users::list_users(store),
        Route::GetUser => users::get_user(store, request.path_parameter("username")?),
        Route::CreateUser => {
            users::create_user(store, request.path_parameter("username")?, request.body())
        }
        Route::UpdateUser => {
            users::update_user(store, request.path_parameter("username")?, request.body())
        }
        Route::DeleteUser => users::delete_user(store, request.path_parameter("username")?),
        Route::ListOrders => orders::list_orders(store, request.path_parameter("username")?),
        Route::CreateOrder => {
            orders::create_order(store, request.path_parameter("username")?, request.body())
        }
        Route::ListOrdersByStatus => orders::list_orders_by_status(
            store,
            request.path_parameter("username")?,
            request.path_parameter("status")?,
        ),
        Route::GetOrder => orders::get_order(
            store,
            request.path_parameter("username")?,
            request.path_parameter("id")?,
        ),
        Route::UpdateOrder => orders::update_order(
            store,
            request.path_parameter("username")?,
            request.path_parameter("id")?,
            request.body(),
        ),
        Route::DeleteOrder => orders::delete_order(
            store,
            request.path_parameter("username")?,
            request.path_parameter("id")?,
        ),
    }
}

fn log_failure(route: Option<Route>, error: &RequestError) {
    let route = route.map_or("unmatched", Route::name);
    if error.status_code() >= 500 {
        tracing::error!(
            component = COMPONENT,
            event = "request_failed",
            route,
            kind = error.kind(),
            error = %error,
        );
    } else {
        tracing::info!(
            component = COMPONENT,
            event = "request_rejected",
            route,
            kind = error.kind(),
            status_code = error.status_code(),
            error = %error,
        );
    }
}

pub(crate) fn success_response(
    status_code: u16,
    payload: &impl Serialize,
) -> Result<ApiGatewayResponse, RequestError> {
    Ok(ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: serde_json::to_string(payload)?,
    })
}

pub(crate) fn message_response(
    status_code: u16,
    message: String,
) -> Result<ApiGatewayResponse, RequestError> {
    success_response(status_code, &json!({ "message": message }))
}

fn error_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": "application/json"}),
        body: payload.to_string(),
    }
}
