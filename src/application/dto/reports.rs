//! # Report DTOs
//!
//! ワークフローの1サイクル分の結果

use std::path::PathBuf;

use crate::domain::entities::batch::BatchNumber;

/// アップロード済みの1ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPhoto {
    pub name: String,
    pub object_id: String,
}

/// 1バッチ分のアップロード結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub batch: BatchNumber,
    pub folder_id: String,
    pub photos: Vec<UploadedPhoto>,
}

impl UploadReport {
    /// アップロードされたオブジェクトIDを順に返す
    pub fn object_ids(&self) -> Vec<&str> {
        self.photos.iter().map(|p| p.object_id.as_str()).collect()
    }
}

/// アップロード要求の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// パスが存在しない（バッチ番号は消費しない）
    NotFound(PathBuf),
    /// バッチを作成してアップロードした
    Uploaded(UploadReport),
}

/// 配信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionReport {
    pub folder_id: String,
    pub urls: Vec<String>,
    /// 最後に送信したメッセージのID（送信なしなら `None`）
    pub last_message_id: Option<String>,
}

/// 配信設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// 送信元アドレス
    pub sender_address: String,
    /// 宛先に付けるチャネルプレフィックス（例: `whatsapp:`）
    pub channel_prefix: String,
    /// メッセージ本文
    pub message_body: String,
    /// ダウンロードURLのホスト
    pub storage_host: String,
}
