//! Single-table access-pattern primitives for the orders API.
//!
//! This crate owns record shapes, key construction, request validation and the
//! route table. It intentionally excludes AWS SDK and Lambda runtime concerns,
//! which live in `orders_api_lambda`.

pub mod codec;
pub mod keys;
pub mod model;
pub mod routes;
pub mod validation;
