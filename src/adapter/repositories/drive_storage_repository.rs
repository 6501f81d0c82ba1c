//! Drive Storage Repository Implementation
//!
//! StorageRepositoryのGoogle Drive実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::adapter::drive::client::DriveClient;
use crate::adapter::drive::models::{FileList, FileMetadata, PermissionRequest};
use crate::adapter::drive::query::{render, FOLDER_MIME_TYPE};
use crate::domain::entities::photo::{FilePage, Photo, RemoteObject};
use crate::domain::repositories::storage_repository::{FileQuery, StorageRepository};

/// Google Driveストレージリポジトリ
pub struct DriveStorageRepository {
    client: Arc<DriveClient>,
}

impl DriveStorageRepository {
    /// 新しいリポジトリを作成
    pub fn new(client: Arc<DriveClient>) -> Self {
        Self { client }
    }

    /// Drive の一覧レスポンスを Domain のページに変換
    fn to_domain_page(list: FileList) -> FilePage {
        FilePage {
            files: list
                .files
                .into_iter()
                .map(|file| RemoteObject::new(file.id, file.name))
                .collect(),
            next_page_token: list.next_page_token.filter(|token| !token.is_empty()),
        }
    }
}

#[async_trait]
impl StorageRepository for DriveStorageRepository {
    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String> {
        let metadata = FileMetadata {
            name: name.to_string(),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            parents: vec![parent_id.to_string()],
        };

        let folder = self.client.create_file(&metadata).await?;
        Ok(folder.id)
    }

    async fn upload_file(&self, photo: &Photo, parent_id: &str) -> Result<String> {
        let content = tokio::fs::read(photo.path())
            .await
            .with_context(|| format!("Failed to read {}", photo.path().display()))?;

        let metadata = FileMetadata {
            name: photo.name().to_string(),
            mime_type: None,
            parents: vec![parent_id.to_string()],
        };

        let file = self
            .client
            .upload(&metadata, photo.content_type(), content)
            .await?;
        Ok(file.id)
    }

    async fn list_files(&self, query: &FileQuery, page_token: Option<String>) -> Result<FilePage> {
        let q = render(query);
        let list = self.client.list(&q, page_token.as_deref()).await?;
        Ok(Self::to_domain_page(list))
    }

    async fn grant_public_read(&self, file_id: &str) -> Result<()> {
        self.client
            .create_permission(file_id, &PermissionRequest::anyone_reader())
            .await
    }
}
