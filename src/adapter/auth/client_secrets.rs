//! OAuth Client Secrets
//!
//! Google Cloud Console からダウンロードした `credentials.json` の読み込み

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::adapter::error::CredentialError;

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// OAuth クライアント情報
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read client secrets: {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse an `installed` (desktop) or `web` client secrets document
    pub fn from_json(content: &str) -> Result<Self> {
        let file: ClientSecretsFile =
            serde_json::from_str(content).context("Failed to parse client secrets JSON")?;

        file.installed
            .or(file.web)
            .ok_or_else(|| CredentialError::MalformedClientSecrets.into())
    }
}
