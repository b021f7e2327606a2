//! Client library for the Pterodactyl panel application API.
//!
//! `PanelClient` authenticates with an application API token and exposes
//! list/get/create/update/delete operations on panel users. Every call
//! resolves to exactly one outcome: the typed payload, or an [`ApiError`]
//! classifying what went wrong.
//!
//! ```no_run
//! use pteroctl_core::{NewUser, PanelClient};
//!
//! # async fn run() -> Result<(), pteroctl_core::ApiError> {
//! let client = PanelClient::new("https://panel.example.com", "ptla_...")?;
//! let id = client
//!     .create_user(&NewUser::new("ada@example.com", "ada", "Ada", "Lovelace"))
//!     .await?;
//! if let Some(user) = client.get_user(id).await? {
//!     println!("{} <{}>", user.full_name(), user.attributes.email);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiError, PanelClient, PanelError, Resource};
pub use config::ClientConfig;
pub use models::{NewUser, User, UserAttributes, UserId, UserUpdate};
