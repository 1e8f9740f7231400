//! Marketing Graph API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication,
//! cursor-following pagination and Graph error classification. Resource
//! bindings consume it through the [`GraphApi`] trait so they can be
//! tested without a network.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod route;
pub mod types;

pub use api::{BoxFuture, GraphApi};
pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use error::GraphError;
pub use route::Route;
