use serde::{Deserialize, Serialize};

/// Server configuration from `/admin/config`.
///
/// These are the server's knobs, not the client's (see `crate::config` for
/// those); the client displays and round-trips them without interpretation.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Session inactivity timeout, in minutes
    pub timeout: i64,
    pub key_derivation: String,
    pub api_port: u16,
    pub enable_tls: bool,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Partial server configuration for `PUT /admin/config`; absent fields are
/// left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_derivation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_tls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_patch_serializes_only_set_fields() {
        let patch = ServerConfigPatch {
            timeout: Some(15),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"timeout": 15})
        );
    }
}
