//! Configuration
//!
//! JSON設定ファイルの読み込み

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::dto::reports::DeliveryConfig;

fn default_client_secrets_path() -> String {
    "credentials.json".to_string()
}

fn default_token_path() -> String {
    "token.json".to_string()
}

fn default_messaging_credentials_path() -> String {
    "twilo_creds.json".to_string()
}

fn default_sender_address() -> String {
    "whatsapp:+14155238886".to_string()
}

fn default_channel_prefix() -> String {
    "whatsapp:".to_string()
}

fn default_country_code() -> String {
    "+65".to_string()
}

fn default_message_body() -> String {
    "Thank you for coming!".to_string()
}

fn default_storage_host() -> String {
    "drive.google.com".to_string()
}

fn default_startup_delay_secs() -> u64 {
    2
}

fn default_first_batch_number() -> u32 {
    1
}

fn default_drive_api_base() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_messaging_api_base() -> String {
    "https://api.twilio.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// バッチフォルダを作成する親フォルダのID
    pub root_folder_id: String,

    // Authentication
    #[serde(default = "default_client_secrets_path")]
    pub client_secrets_path: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_messaging_credentials_path")]
    pub messaging_credentials_path: String,

    // Messaging
    #[serde(default = "default_sender_address")]
    pub sender_address: String,
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_message_body")]
    pub message_body: String,

    // Storage
    #[serde(default = "default_storage_host")]
    pub storage_host: String,
    #[serde(default = "default_first_batch_number")]
    pub first_batch_number: u32,

    #[serde(default = "default_startup_delay_secs")]
    pub startup_delay_secs: u64,

    // API endpoints (overridable for testing)
    #[serde(default = "default_drive_api_base")]
    pub drive_api_base: String,
    #[serde(default = "default_messaging_api_base")]
    pub messaging_api_base: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = expand_path(path);
        let content = fs::read_to_string(&expanded)
            .with_context(|| format!("Failed to read config file: {}", expanded.display()))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;
        Ok(config)
    }

    pub fn client_secrets_path(&self) -> PathBuf {
        expand_path(&self.client_secrets_path)
    }

    pub fn token_path(&self) -> PathBuf {
        expand_path(&self.token_path)
    }

    pub fn messaging_credentials_path(&self) -> PathBuf {
        expand_path(&self.messaging_credentials_path)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    /// 配信ユースケース用の設定
    pub fn delivery_config(&self) -> DeliveryConfig {
        DeliveryConfig {
            sender_address: self.sender_address.clone(),
            channel_prefix: self.channel_prefix.clone(),
            message_body: self.message_body.clone(),
            storage_host: self.storage_host.clone(),
        }
    }
}

/// Expands tilde in path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
