//! REST API client module for the Lockbox vault server.
//!
//! This module provides the `ApiClient` for issuing requests against the
//! vault API and unwrapping its `{success, data, message}` envelope.
//!
//! Authenticated endpoints carry the session token as a bearer credential;
//! every failure, transport-level or envelope-level, surfaces as the same
//! `ApiError` so callers treat all rejections identically.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
