//! Authentication module for managing the vault session.
//!
//! This module provides:
//! - `Session`: token-based session management with expiry and persistence
//! - `guard`: the route policy that keeps unauthenticated users out of the
//!   protected area (and authenticated users off the login view)
//!
//! The session is persisted to disk as a single JSON record and restored on
//! startup; an expired record is purged during restore.

pub mod guard;
pub mod session;

pub use session::{Session, SessionData, SessionState, SharedSession};
