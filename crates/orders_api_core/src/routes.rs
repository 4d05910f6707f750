//! Route table for the REST surface.
//!
//! API Gateway delivers the templated resource path (for example
//! `/orders/username/{username}/id/{id}`) together with the HTTP method. Each
//! supported pair maps to exactly one [`Route`]; anything else is unmatched.

pub const USERS_RESOURCE: &str = "/users";
pub const USER_RESOURCE: &str = "/users/username/{username}";
pub const ORDERS_RESOURCE: &str = "/orders/username/{username}";
pub const ORDERS_BY_STATUS_RESOURCE: &str = "/orders/username/{username}/status/{status}";
pub const ORDER_RESOURCE: &str = "/orders/username/{username}/id/{id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    UserCollection,
    UserByName,
    OrderCollectionByUser,
    OrderByStatus,
    OrderById,
}

impl Resource {
    pub const ALL: [Self; 5] = [
        Self::UserCollection,
        Self::UserByName,
        Self::OrderCollectionByUser,
        Self::OrderByStatus,
        Self::OrderById,
    ];

    pub fn template(self) -> &'static str {
        match self {
            Self::UserCollection => USERS_RESOURCE,
            Self::UserByName => USER_RESOURCE,
            Self::OrderCollectionByUser => ORDERS_RESOURCE,
            Self::OrderByStatus => ORDERS_BY_STATUS_RESOURCE,
            Self::OrderById => ORDER_RESOURCE,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = match raw.trim_end_matches('/') {
            "" => "/",
            value => value,
        };
        Self::ALL
            .into_iter()
            .find(|resource| resource.template() == trimmed)
    }
}

/// The Lambda function that owns a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Users,
    Orders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    ListUsers,
    GetUser,
    CreateUser,
    UpdateUser,
    DeleteUser,
    ListOrders,
    CreateOrder,
    ListOrdersByStatus,
    GetOrder,
    UpdateOrder,
    DeleteOrder,
}

pub const ROUTE_TABLE: [(HttpMethod, Resource, Route); 11] = [
    (HttpMethod::Get, Resource::UserCollection, Route::ListUsers),
    (HttpMethod::Get, Resource::UserByName, Route::GetUser),
    (HttpMethod::Post, Resource::UserByName, Route::CreateUser),
    (HttpMethod::Put, Resource::UserByName, Route::UpdateUser),
    (HttpMethod::Delete, Resource::UserByName, Route::DeleteUser),
    (HttpMethod::Get, Resource::OrderCollectionByUser, Route::ListOrders),
    (HttpMethod::Post, Resource::OrderCollectionByUser, Route::CreateOrder),
    (HttpMethod::Get, Resource::OrderByStatus, Route::ListOrdersByStatus),
    (HttpMethod::Get, Resource::OrderById, Route::GetOrder),
    (HttpMethod::Put, Resource::OrderById, Route::UpdateOrder),
    (HttpMethod::Delete, Resource::OrderById, Route::DeleteOrder),
];

impl Route {
    pub fn resolve(method: HttpMethod, resource: Resource) -> Option<Self> {
        ROUTE_TABLE
            .iter()
            .find(|(candidate_method, candidate_resource, _)| {
                *candidate_method == method && *candidate_resource == resource
            })
            .map(|(_, _, route)| *route)
    }

    pub fn resolve_raw(method: &str, resource: &str) -> Option<Self> {
        Self::resolve(HttpMethod::parse(method)?, Resource::parse(resource)?)
    }

    pub fn resource(self) -> Resource {
        match self {
            Self::ListUsers => Resource::UserCollection,
            Self::GetUser | Self::CreateUser | Self::UpdateUser | Self::DeleteUser => {
                Resource::UserByName
            }
            Self::ListOrders | Self::CreateOrder => Resource::OrderCollectionByUser,
            Self::ListOrdersByStatus => Resource::OrderByStatus,
            Self::GetOrder | Self::UpdateOrder | Self::DeleteOrder => Resource::OrderById,
        }
    }

    pub fn service(self) -> Service {
        match self.resource() {
            Resource::UserCollection | Resource::UserByName => Service::Users,
            Resource::OrderCollectionByUser | Resource::OrderByStatus | Resource::OrderById => {
                Service::Orders
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ListUsers => "list_users",
            Self::GetUser => "get_user",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeleteUser => "delete_user",
            Self::ListOrders => "list_orders",
            Self::CreateOrder => "create_order",
            Self::ListOrdersByStatus => "list_orders_by_status",
            Self::GetOrder => "get_order",
            Self::UpdateOrder => "update_order",
            Self::DeleteOrder => "delete_order",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_table_entry_is_unique_and_consistent() {
        let mut pairs = HashSet::new();
        let mut routes = HashSet::new();
        for (method, resource, route) in ROUTE_TABLE {
            assert!(pairs.insert((method, resource)), "duplicate {method:?} {resource:?}");
            assert!(routes.insert(route), "duplicate route {route:?}");
            assert_eq!(route.resource(), resource);
        }
    }

    #[test]
    fn resolves_templated_resources() {
        assert_eq!(
            Route::resolve_raw("GET", "/orders/username/{username}/status/{status}"),
            Some(Route::ListOrdersByStatus)
        );
        assert_eq!(
            Route::resolve_raw("delete", "/orders/username/{username}/id/{id}"),
            Some(Route::DeleteOrder)
        );
        assert_eq!(Route::resolve_raw("GET", "/users/"), Some(Route::ListUsers));
    }

    #[test]
    fn unmatched_pairs_resolve_to_none() {
        assert_eq!(Route::resolve_raw("POST", USERS_RESOURCE), None);
        assert_eq!(Route::resolve_raw("PUT", ORDERS_RESOURCE), None);
        assert_eq!(Route::resolve_raw("DELETE", ORDERS_BY_STATUS_RESOURCE), None);
        assert_eq!(Route::resolve_raw("PATCH", USER_RESOURCE), None);
        assert_eq!(Route::resolve_raw("GET", "/users/username/alice"), None);
        assert_eq!(Route::resolve_raw("GET", "/"), None);
    }

    #[test]
    fn routes_belong_to_their_service() {
        assert_eq!(Route::CreateUser.service(), Service::Users);
        assert_eq!(Route::ListUsers.service(), Service::Users);
        assert_eq!(Route::ListOrdersByStatus.service(), Service::Orders);
        assert_eq!(Route::DeleteOrder.service(), Service::Orders);
    }
}
