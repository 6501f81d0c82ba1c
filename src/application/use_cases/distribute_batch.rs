//! # Distribute Batch Use Case
//!
//! バッチ番号からダウンロードURLを解決して配信先に送るユースケース

use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;

use crate::application::dto::reports::{DeliveryConfig, DistributionReport};
use crate::application::dto::requests::DistributionRequest;
use crate::domain::entities::recipient::PhoneRecipient;
use crate::domain::errors::BatchLookupError;
use crate::domain::repositories::messaging_repository::{MessagingRepository, OutboundMessage};
use crate::domain::repositories::storage_repository::{list_all, FileQuery, StorageRepository};
use crate::domain::services::download_url::DownloadUrlService;

/// バッチ配信ユースケース
///
/// フォルダ解決 → 公開権限付与 → URL収集 → 送信 を順に実行する
pub struct DistributeBatchUseCase<S: StorageRepository, M: MessagingRepository> {
    storage_repository: Arc<S>,
    messaging_repository: Arc<M>,
    config: DeliveryConfig,
}

impl<S: StorageRepository, M: MessagingRepository> DistributeBatchUseCase<S, M> {
    /// 新しいユースケースを作成
    pub fn new(
        storage_repository: Arc<S>,
        messaging_repository: Arc<M>,
        config: DeliveryConfig,
    ) -> Self {
        Self {
            storage_repository,
            messaging_repository,
            config,
        }
    }

    /// バッチ番号と同名のフォルダIDを解決する
    ///
    /// # Errors
    ///
    /// 一致するフォルダが無い場合は `BatchLookupError::NotFound`、
    /// 複数ある場合は `BatchLookupError::Ambiguous` を返す
    pub async fn resolve_batch_folder(&self, batch: &str) -> Result<String> {
        let query = FileQuery::FoldersNamed(batch.to_string());
        let mut folders = list_all(self.storage_repository.as_ref(), &query)
            .await
            .with_context(|| format!("Failed to look up batch {}", batch))?;

        match folders.len() {
            0 => Err(BatchLookupError::NotFound(batch.to_string()).into()),
            1 => {
                let folder = folders.remove(0);
                debug!("Resolved batch {} to folder {}", batch, folder.id);
                Ok(folder.id)
            }
            _ => Err(BatchLookupError::Ambiguous {
                name: batch.to_string(),
                ids: folders.into_iter().map(|f| f.id).collect(),
            }
            .into()),
        }
    }

    /// フォルダを誰でも閲覧可能にする
    ///
    /// 後続の処理が失敗してもロールバックしない
    pub async fn grant_public_read(&self, folder_id: &str) -> Result<()> {
        self.storage_repository
            .grant_public_read(folder_id)
            .await
            .with_context(|| format!("Failed to grant public read on {}", folder_id))?;

        info!("Granted public read on folder {}", folder_id);
        Ok(())
    }

    /// フォルダ直下の全オブジェクトのダウンロードURLを収集する
    pub async fn collect_download_urls(&self, folder_id: &str) -> Result<Vec<String>> {
        let query = FileQuery::ChildrenOf(folder_id.to_string());
        let objects = list_all(self.storage_repository.as_ref(), &query)
            .await
            .with_context(|| format!("Failed to list files in {}", folder_id))?;

        Ok(DownloadUrlService::build_all(
            &self.config.storage_host,
            &objects,
        ))
    }

    /// URLごとに1通ずつメッセージを送信する
    ///
    /// # Returns
    ///
    /// 最後に送信したメッセージのID（URLが空なら `None`）
    pub async fn deliver(
        &self,
        urls: &[String],
        recipient: &PhoneRecipient,
    ) -> Result<Option<String>> {
        let to = recipient.channel_address(&self.config.channel_prefix);
        let mut last_message_id = None;

        for url in urls {
            let message = OutboundMessage {
                from: self.config.sender_address.clone(),
                to: to.clone(),
                body: self.config.message_body.clone(),
                media_url: url.clone(),
            };

            let message_id = self
                .messaging_repository
                .send_message(&message)
                .await
                .with_context(|| format!("Failed to send {} to {}", url, recipient))?;

            debug!("Sent message {} with {}", message_id, url);
            last_message_id = Some(message_id);
        }

        Ok(last_message_id)
    }

    /// 配信要求を1件処理する
    ///
    /// # Errors
    ///
    /// フォルダ解決・ストレージ・メッセージングのいずれかが失敗した場合にエラーを返す
    pub async fn execute(&self, request: &DistributionRequest) -> Result<DistributionReport> {
        let folder_id = self.resolve_batch_folder(&request.batch).await?;
        self.grant_public_read(&folder_id).await?;
        let urls = self.collect_download_urls(&folder_id).await?;
        let last_message_id = self.deliver(&urls, &request.recipient).await?;

        Ok(DistributionReport {
            folder_id,
            urls,
            last_message_id,
        })
    }
}
