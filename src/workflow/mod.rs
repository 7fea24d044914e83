//! Client for the remote workflow admin API.

mod client;
mod http;
mod types;

pub use client::WorkflowClient;
pub use http::{http_get, http_post};
pub use types::{ApiEnvelope, UpdateEndpoint, STATUS_SUCCESS};
