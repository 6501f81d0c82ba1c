//! Local Photo Repository Implementation
//!
//! PhotoRepositoryのファイルシステム実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::entities::photo::Photo;
use crate::domain::repositories::photo_repository::PhotoRepository;

/// ファイルシステムベースの写真リポジトリ
pub struct LocalPhotoRepository;

impl LocalPhotoRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// ディレクトリ直下のファイルを発見する（内部実装）
    fn discover_photos_internal(dir: &Path) -> Result<Vec<Photo>> {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }

        let mut paths: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }

        info!("Found {} photos in {}", paths.len(), dir.display());

        Ok(paths.into_iter().map(Photo::from_path).collect())
    }
}

#[async_trait]
impl PhotoRepository for LocalPhotoRepository {
    async fn discover_photos(&self, dir: &Path) -> Result<Vec<Photo>> {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || Self::discover_photos_internal(&dir))
            .await
            .context("Failed to spawn blocking task")?
    }
}

impl Default for LocalPhotoRepository {
    fn default() -> Self {
        Self::new()
    }
}
