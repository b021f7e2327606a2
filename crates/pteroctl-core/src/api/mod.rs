//! REST client for the panel's application API.
//!
//! This module provides the `PanelClient` for administering panel users.
//! Every request carries a bearer token (an application API key) and the
//! panel's versioned `Accept` header.

pub mod client;
pub mod error;
pub mod resource;

pub use client::PanelClient;
pub use error::{ApiError, PanelError};
pub use resource::Resource;
