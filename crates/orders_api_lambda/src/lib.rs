//! AWS-oriented adapters and handlers for the orders API.
//!
//! This crate owns runtime integration details (Lambda handlers, DynamoDB
//! access and environment configuration). Record shapes, keys, validation and
//! the route table come from `orders_api_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod runtime;
pub mod telemetry;
