//! # Storefront server
//! This crate hosts the HTTP server for the storefront API. It is responsible for:
//! * Registering users and logging them in, storing passwords with the [credential codec](credentials) and handing out
//!   [session tokens](auth).
//! * Guarding every route with an authorization [gate](middleware) before the handler runs.
//! * Translating requests into single store operations on users, products, carts and orders.
//! * Forwarding card payments to the [payment processor](integrations::stripe).
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! Apart from `/health` and `/`, every route lives under `/api`. See [routes](routes/index.html).
pub mod auth;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
