//! Twilio REST Client
//!
//! Programmable Messaging の Messages リソースを呼び出す

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::credentials::MessagingCredentials;
use crate::adapter::error::check_status;

const SERVICE: &str = "Twilio";

/// Messages リソースのレスポンス（必要なフィールドのみ）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResource {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

pub struct TwilioClient {
    http: Client,
    api_base: String,
    credentials: MessagingCredentials,
}

impl TwilioClient {
    pub fn new(http: Client, api_base: &str, credentials: MessagingCredentials) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn connect(api_base: &str, credentials: MessagingCredentials) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client for Twilio API")?;
        Ok(Self::new(http, api_base, credentials))
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.credentials.account_sid
        )
    }

    /// Create one message carrying a single media URL
    pub async fn create_message(
        &self,
        from: &str,
        to: &str,
        body: &str,
        media_url: &str,
    ) -> Result<MessageResource> {
        let url = self.messages_url();
        debug!("POST {} to={} media={}", url, to, media_url);

        let form = [
            ("From", from),
            ("To", to),
            ("Body", body),
            ("MediaUrl", media_url),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&form)
            .send()
            .await
            .context("Failed to send Twilio message request")?;

        let response = check_status(SERVICE, response).await?;
        response
            .json()
            .await
            .context("Failed to parse Twilio message response")
    }
}
