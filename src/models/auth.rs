use chrono::{DateTime, Utc};

/// Result of a successful `/auth` or `/init` call.
///
/// The token is opaque; callers hand it straight to `Session::login` together
/// with the expiry. The wire carries the expiry as an RFC 3339 string, which
/// the API layer converts before constructing this type.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: String,
    pub expiry: DateTime<Utc>,
    /// Server-side inactivity timeout, in minutes (informational).
    pub timeout_min: i64,
}
