//! Clients for the external services the storefront talks to.
pub mod stripe;
