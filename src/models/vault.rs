use serde::{Deserialize, Serialize};

/// `/health` probe: does a vault exist yet, and what is the server running.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthInfo {
    #[serde(rename = "vaultExists")]
    pub vault_exists: bool,
    pub version: String,
    pub status: String,
}

/// Aggregate security status from `/vault/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultHealth {
    pub total_entries: i64,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub status: VaultStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultStatus {
    Empty,
    Good,
    Warning,
    Critical,
}

impl VaultStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            VaultStatus::Empty => "Empty",
            VaultStatus::Good => "Good",
            VaultStatus::Warning => "Warning",
            VaultStatus::Critical => "Critical",
        }
    }
}

/// Server-generated password from `/generate-password`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedPassword {
    pub password: String,
    pub length: usize,
}

/// Options for server-side password generation.
#[derive(Debug, Clone, Copy)]
pub struct PasswordSpec {
    pub length: usize,
    pub upper: bool,
    pub lower: bool,
    pub digits: bool,
    pub special: bool,
}

impl Default for PasswordSpec {
    fn default() -> Self {
        Self {
            length: 16,
            upper: true,
            lower: true,
            digits: true,
            special: true,
        }
    }
}

/// Receipt for a completed `/vault/backup`.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupReceipt {
    pub backup_file: String,
    pub backup_time: String,
    pub backup_path: String,
}

/// Receipt for a completed `/vault/restore`.
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreReceipt {
    pub backup_file: String,
    pub restore_time: String,
}

/// Body for `/vault/restore`: which backup artifact to restore from.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreRequest {
    pub backup_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_status_parses_lowercase_wire_values() {
        let health: VaultHealth = serde_json::from_str(
            r#"{"total_entries": 3, "issues": ["reused password"], "status": "warning"}"#,
        )
        .unwrap();
        assert_eq!(health.status, VaultStatus::Warning);
        assert_eq!(health.total_entries, 3);
        assert_eq!(health.issues, vec!["reused password"]);
        assert!(health.warnings.is_empty());
    }
}
