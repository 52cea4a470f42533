//! Data models for the Lockbox wire protocol.
//!
//! This module contains the typed payloads exchanged with the vault server:
//!
//! - `AuthGrant`: token/expiry pair returned by authentication
//! - `SecretEntry`, `SecretPatch`: stored credentials and partial updates
//! - Vault types: `HealthInfo`, `VaultHealth`, `GeneratedPassword`,
//!   `BackupReceipt`, `RestoreReceipt`
//! - `ServerConfig`, `ServerConfigPatch`: server-side configuration
//!
//! Apart from the auth expiry (converted to `DateTime<Utc>` by the API
//! layer), payload contents are opaque to this client and passed through
//! untouched.

pub mod auth;
pub mod config;
pub mod secret;
pub mod vault;

pub use auth::AuthGrant;
pub use config::{ServerConfig, ServerConfigPatch};
pub use secret::{SecretEntry, SecretPatch};
pub use vault::{
    BackupReceipt, GeneratedPassword, HealthInfo, PasswordSpec, RestoreReceipt, RestoreRequest,
    VaultHealth, VaultStatus,
};
