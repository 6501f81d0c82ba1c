//! # Photo Repository Trait
//!
//! ローカルの写真ファイルの発見を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::photo::Photo;

/// 写真リポジトリ
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// ディレクトリ直下の写真を発見する
    ///
    /// # Arguments
    ///
    /// * `dir` - 写真ディレクトリのパス
    ///
    /// # Returns
    ///
    /// ファイル名順に並んだ写真のリスト（サブディレクトリは含まない）
    async fn discover_photos(&self, dir: &Path) -> Result<Vec<Photo>>;
}
