//! Twilio Credentials
//!
//! メッセージング用の認証情報ファイル（読み込み専用）

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// `{"account_sid": "...", "auth_token": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessagingCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl MessagingCredentials {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read messaging credentials: {}", path.display())
        })?;
        serde_json::from_str(&content).context("Failed to parse messaging credentials JSON")
    }
}
