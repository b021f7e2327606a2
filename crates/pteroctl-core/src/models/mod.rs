//! Data models for panel application API entities.
//!
//! - `User`, `UserAttributes`: server-owned user records
//! - `NewUser`: creation draft, validated before sending
//! - `UserUpdate`: partial update draft, sent as-is

pub mod user;

pub use user::{NewUser, User, UserAttributes, UserId, UserUpdate};
pub(crate) use user::{CreatedUser, UserList};
