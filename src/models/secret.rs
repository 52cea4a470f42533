use serde::{Deserialize, Serialize};

/// A stored credential as the server returns it.
///
/// Timestamps stay as the server's strings; this client never interprets
/// them. The password arrives masked when the listing was requested with
/// `hidePasswords`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretEntry {
    pub id: String,
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub modified_at: String,
    pub last_accessed: String,
}

impl SecretEntry {
    pub fn display_url(&self) -> &str {
        self.url.as_deref().unwrap_or("-")
    }
}

/// Partial secret for create/update calls; absent fields are left out of the
/// request body so the server keeps its current values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecretPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_omits_absent_fields() {
        let patch = SecretPatch {
            title: Some("GitHub".to_string()),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "GitHub", "password": "hunter2"})
        );
    }
}
