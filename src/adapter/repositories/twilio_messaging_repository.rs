//! Twilio Messaging Repository Implementation
//!
//! MessagingRepositoryのTwilio実装

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::adapter::twilio::client::TwilioClient;
use crate::domain::repositories::messaging_repository::{MessagingRepository, OutboundMessage};

/// Twilioメッセージングリポジトリ
pub struct TwilioMessagingRepository {
    client: Arc<TwilioClient>,
}

impl TwilioMessagingRepository {
    /// 新しいリポジトリを作成
    pub fn new(client: Arc<TwilioClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessagingRepository for TwilioMessagingRepository {
    async fn send_message(&self, message: &OutboundMessage) -> Result<String> {
        let resource = self
            .client
            .create_message(
                &message.from,
                &message.to,
                &message.body,
                &message.media_url,
            )
            .await?;
        Ok(resource.sid)
    }
}
