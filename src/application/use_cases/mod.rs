//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **AuthenticateUseCase**: 認証情報の読み込み・更新・取得
//! - **UploadBatchUseCase**: 写真のバッチアップロード
//! - **DistributeBatchUseCase**: バッチのダウンロードURL配信

pub mod authenticate;
pub mod distribute_batch;
pub mod upload_batch;
