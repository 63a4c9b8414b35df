//! Types and helpers shared by the storefront engine and server crates.
pub mod helpers;
mod secret;

pub use secret::Secret;
