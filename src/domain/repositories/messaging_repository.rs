//! # Messaging Repository Trait
//!
//! メディア付きメッセージ送信を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// 送信メッセージ（メディアURLは1件のみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// 送信元アドレス（例: `whatsapp:+14155238886`）
    pub from: String,
    /// 宛先アドレス（チャネルプレフィックス付き）
    pub to: String,
    pub body: String,
    pub media_url: String,
}

/// メッセージングリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagingRepository: Send + Sync {
    /// メッセージを1件送信する
    ///
    /// # Returns
    ///
    /// プロバイダが採番したメッセージID
    async fn send_message(&self, message: &OutboundMessage) -> Result<String>;
}
