//! HTTP middleware layers.

pub mod cors;

pub use cors::{create_cors_layer, create_permissive_cors_layer};
