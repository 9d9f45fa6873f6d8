//! # forum-api
//!
//! HTTP surface of the forum backend built with Axum: form endpoints for
//! local and federated login and for thread and comment reactions, plus a
//! few JSON endpoints for profile pages and probes.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, create_app_state_with, run, run_server};
pub use state::AppState;
