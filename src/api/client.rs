//! API client for communicating with the Lockbox vault server.
//!
//! Every response body is the uniform `{success, data, message}` envelope.
//! The generic request path attaches the bearer token (re-read from the
//! shared session on every call), unwraps the envelope, and collapses every
//! kind of failure into a single `ApiError` with a displayable message.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::SharedSession;
use crate::models::{
    AuthGrant, BackupReceipt, GeneratedPassword, HealthInfo, PasswordSpec, RestoreReceipt,
    RestoreRequest, SecretEntry, SecretPatch, ServerConfig, ServerConfigPatch, VaultHealth,
};

use super::error::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow vault operations (backup/restore) while still failing
/// fast enough for interactive use.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Uniform wire envelope wrapping every server response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// Body shape attempted on non-2xx responses; anything unparseable is
/// treated as an empty object.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Build an error from a failing response body: the server's `message` if
/// the body parses, the fallback otherwise. Never surfaces partial data.
fn error_from_body(body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    ApiError::from_message(parsed.message)
}

/// Unwrap an envelope into its typed payload.
///
/// `success: false` surfaces the envelope's message exactly as a transport
/// failure would; callers cannot tell the two apart. A success envelope
/// missing its payload is malformed and also fails normalized.
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Malformed response envelope");
        ApiError::fallback()
    })?;
    if !envelope.success {
        return Err(ApiError::from_message(envelope.message));
    }
    envelope.data.ok_or_else(|| {
        warn!("Envelope reported success but carried no data");
        ApiError::fallback()
    })
}

/// Like `unwrap_envelope` for endpoints whose payload is empty or ignored
/// (logout, delete, change-password).
fn check_envelope(body: &str) -> Result<(), ApiError> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Malformed response envelope");
        ApiError::fallback()
    })?;
    if !envelope.success {
        return Err(ApiError::from_message(envelope.message));
    }
    Ok(())
}

/// Authentication response as it appears on the wire. The expiry is the one
/// timestamp this layer converts for callers; everything else passes through
/// untouched.
#[derive(Debug, Deserialize)]
struct AuthGrantWire {
    token: String,
    expiry: String,
    timeout_min: i64,
}

impl AuthGrantWire {
    fn into_grant(self) -> Result<AuthGrant, ApiError> {
        let expiry = DateTime::parse_from_rfc3339(&self.expiry)
            .map_err(|e| {
                warn!(error = %e, "Server sent an unparseable session expiry");
                ApiError::fallback()
            })?
            .with_timezone(&Utc);
        Ok(AuthGrant {
            token: self.token,
            expiry,
            timeout_min: self.timeout_min,
        })
    }
}

/// API client for the Lockbox vault server.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SharedSession,
}

impl ApiClient {
    /// Create a new API client against the given base URL, reading its bearer
    /// token from the shared session.
    pub fn new(base_url: impl Into<String>, session: SharedSession) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            session,
        })
    }

    /// Current bearer token, re-read on every request. Login and logout may
    /// change it between calls, so it is never cached here.
    fn bearer_token(&self) -> Option<String> {
        match self.session.read() {
            Ok(session) => session.token().map(str::to_owned),
            Err(_) => None,
        }
    }

    /// Issue a request and return the raw body of a 2xx response. Requests
    /// without a token are still sent (health/auth/init are unauthenticated);
    /// non-2xx statuses and transport errors come back as `ApiError`.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to reach vault server");
            ApiError::fallback()
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to read response body");
            ApiError::fallback()
        })?;

        if !status.is_success() {
            debug!(url = %url, status = %status, "Server returned an error status");
            return Err(error_from_body(&text));
        }

        Ok(text)
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let text = self.execute(method, path, body).await?;
        unwrap_envelope(&text)
    }

    async fn request_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let text = self.execute(method, path, body).await?;
        check_envelope(&text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    // ===== Auth endpoints =====

    /// Probe the server: does a vault exist yet, and which version is running.
    pub async fn health(&self) -> Result<HealthInfo, ApiError> {
        self.get("/health").await
    }

    /// Exchange the master password for a session token.
    pub async fn authenticate(&self, password: &str) -> Result<AuthGrant, ApiError> {
        let body = serde_json::json!({ "password": password });
        let wire: AuthGrantWire = self.request(Method::POST, "/auth", Some(&body)).await?;
        wire.into_grant()
    }

    /// Create a new vault and get its initial session token.
    pub async fn init_vault(&self, password: &str) -> Result<AuthGrant, ApiError> {
        let body = serde_json::json!({ "password": password });
        let wire: AuthGrantWire = self.request(Method::POST, "/init", Some(&body)).await?;
        wire.into_grant()
    }

    /// Invalidate the server-side session. The local session is cleared
    /// separately via `Session::logout`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.request_unit::<()>(Method::POST, "/logout", None).await
    }

    // ===== Secrets endpoints =====

    pub async fn list_secrets(&self, hide_passwords: bool) -> Result<Vec<SecretEntry>, ApiError> {
        self.get(&format!("/secrets?hidePasswords={}", hide_passwords))
            .await
    }

    pub async fn get_secret(&self, id: &str) -> Result<SecretEntry, ApiError> {
        self.get(&format!("/secrets/{}", id)).await
    }

    pub async fn add_secret(&self, secret: &SecretPatch) -> Result<SecretEntry, ApiError> {
        self.request(Method::POST, "/secrets", Some(secret)).await
    }

    pub async fn update_secret(
        &self,
        id: &str,
        secret: &SecretPatch,
    ) -> Result<SecretEntry, ApiError> {
        self.request(Method::PUT, &format!("/secrets/{}", id), Some(secret))
            .await
    }

    pub async fn delete_secret(&self, id: &str) -> Result<(), ApiError> {
        self.request_unit::<()>(Method::DELETE, &format!("/secrets/{}", id), None)
            .await
    }

    // ===== Vault management endpoints =====

    /// Server-side password generation.
    pub async fn generate_password(
        &self,
        spec: &PasswordSpec,
    ) -> Result<GeneratedPassword, ApiError> {
        let path = format!(
            "/generate-password?length={}&upper={}&lower={}&digits={}&special={}",
            spec.length, spec.upper, spec.lower, spec.digits, spec.special
        );
        self.get(&path).await
    }

    /// Aggregate security status of the vault contents.
    pub async fn vault_health(&self) -> Result<VaultHealth, ApiError> {
        self.get("/vault/health").await
    }

    pub async fn backup_vault(&self) -> Result<BackupReceipt, ApiError> {
        self.request::<BackupReceipt, ()>(Method::POST, "/vault/backup", None)
            .await
    }

    pub async fn restore_vault(&self, backup_file: &str) -> Result<RestoreReceipt, ApiError> {
        let body = RestoreRequest {
            backup_file: backup_file.to_string(),
        };
        self.request(Method::POST, "/vault/restore", Some(&body))
            .await
    }

    /// Rotate the master password. Existing sessions stay valid; the server
    /// decides their fate.
    pub async fn change_master_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "current_password": current_password,
            "new_password": new_password,
        });
        self.request_unit(Method::POST, "/vault/change-password", Some(&body))
            .await
    }

    // ===== Admin endpoints =====

    pub async fn get_config(&self) -> Result<ServerConfig, ApiError> {
        self.get("/admin/config").await
    }

    pub async fn update_config(&self, patch: &ServerConfigPatch) -> Result<ServerConfig, ApiError> {
        self.request(Method::PUT, "/admin/config", Some(patch))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::FALLBACK_MESSAGE;
    use chrono::TimeZone;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Payload {
        name: String,
        count: i64,
    }

    #[test]
    fn envelope_failure_surfaces_server_message_exactly() {
        let body = r#"{"success": false, "message": "X"}"#;
        let err = unwrap_envelope::<Payload>(body).unwrap_err();
        assert_eq!(err.message, "X");
    }

    #[test]
    fn envelope_failure_without_message_falls_back() {
        let body = r#"{"success": false}"#;
        let err = unwrap_envelope::<Payload>(body).unwrap_err();
        assert_eq!(err.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn envelope_failure_never_exposes_data() {
        // data present alongside success:false must not be trusted
        let body = r#"{"success": false, "data": {"name": "x", "count": 1}, "message": "nope"}"#;
        let err = unwrap_envelope::<Payload>(body).unwrap_err();
        assert_eq!(err.message, "nope");
    }

    #[test]
    fn envelope_success_returns_data_untouched() {
        let body = r#"{"success": true, "data": {"name": "vault", "count": 3}}"#;
        let payload: Payload = unwrap_envelope(body).unwrap();
        assert_eq!(
            payload,
            Payload {
                name: "vault".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn envelope_success_without_data_is_an_error() {
        let body = r#"{"success": true}"#;
        let err = unwrap_envelope::<Payload>(body).unwrap_err();
        assert_eq!(err.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn malformed_envelope_fails_normalized() {
        let err = unwrap_envelope::<Payload>("<html>502</html>").unwrap_err();
        assert_eq!(err.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn error_body_with_message_is_used() {
        let err = error_from_body(r#"{"message": "Invalid master password"}"#);
        assert_eq!(err.message, "Invalid master password");
    }

    #[test]
    fn non_json_error_body_falls_back() {
        assert_eq!(error_from_body("Bad Gateway").message, FALLBACK_MESSAGE);
        assert_eq!(error_from_body("").message, FALLBACK_MESSAGE);
    }

    #[test]
    fn unit_envelope_checks_success_and_ignores_data() {
        assert!(check_envelope(r#"{"success": true}"#).is_ok());
        assert!(check_envelope(r#"{"success": true, "data": null}"#).is_ok());
        let err = check_envelope(r#"{"success": false, "message": "expired"}"#).unwrap_err();
        assert_eq!(err.message, "expired");
    }

    #[test]
    fn auth_wire_converts_expiry_to_utc_instant() {
        let wire = AuthGrantWire {
            token: "tok".to_string(),
            expiry: "2024-01-01T00:00:00Z".to_string(),
            timeout_min: 15,
        };
        let grant = wire.into_grant().unwrap();
        assert_eq!(grant.token, "tok");
        assert_eq!(grant.timeout_min, 15);
        assert_eq!(
            grant.expiry,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn bearer_token_is_reread_from_the_session_on_every_call() {
        let dir = std::env::temp_dir().join(format!("lockbox-client-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let session = crate::auth::Session::new(dir).into_shared();
        let client = ApiClient::new("http://localhost:0/api", session.clone()).unwrap();

        assert_eq!(client.bearer_token(), None);

        session
            .write()
            .unwrap()
            .login("tok-1".to_string(), Utc::now() + chrono::Duration::minutes(5))
            .unwrap();
        assert_eq!(client.bearer_token().as_deref(), Some("tok-1"));

        session.write().unwrap().logout().unwrap();
        assert_eq!(client.bearer_token(), None);
    }

    #[test]
    fn auth_wire_with_bad_expiry_fails_normalized() {
        let wire = AuthGrantWire {
            token: "tok".to_string(),
            expiry: "next tuesday".to_string(),
            timeout_min: 15,
        };
        let err = wire.into_grant().unwrap_err();
        assert_eq!(err.message, FALLBACK_MESSAGE);
    }
}
