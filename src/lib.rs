//! Lockbox client library.
//!
//! Core pieces for talking to a Lockbox password-vault server:
//!
//! - `auth`: token-based session management with persistence across runs,
//!   plus the route-guard policy for protected views
//! - `api`: the `ApiClient` for making authenticated requests and unwrapping
//!   the server's `{success, data, message}` response envelope
//! - `models`: typed request/response payloads
//! - `config`: client-side configuration (server address, state directory)
//!
//! All vault cryptography lives server-side; this crate only ever handles an
//! opaque bearer token.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
