//! # Request DTOs
//!
//! ワークフローの1サイクル分の入力

use std::path::PathBuf;

use crate::domain::entities::recipient::PhoneRecipient;

/// アップロード要求（ファイルまたはディレクトリのパス）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub path: PathBuf,
}

impl UploadRequest {
    /// ユーザー入力から作成（前後の空白は除去し、`~` を展開）
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(shellexpand::tilde(path.trim()).as_ref()),
        }
    }
}

/// 配信要求（バッチ番号と配信先）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionRequest {
    /// バッチ番号（フォルダ名と完全一致で検索される）
    pub batch: String,
    pub recipient: PhoneRecipient,
}

impl DistributionRequest {
    pub fn new(batch: &str, recipient: PhoneRecipient) -> Self {
        Self {
            batch: batch.trim().to_string(),
            recipient,
        }
    }
}
