//! HTTP API: configuration, routing, middleware and error mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod server;
