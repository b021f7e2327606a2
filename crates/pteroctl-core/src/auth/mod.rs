//! Request authentication helpers.
//!
//! Current panels authenticate with a bearer application API token, which
//! `PanelClient` attaches to every request. The HMAC signing scheme used by
//! old panel releases is kept only as a permanently disabled entry point.

pub mod signing;

#[allow(deprecated)]
pub use signing::legacy_auth_header;
