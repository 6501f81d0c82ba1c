//! # Photobatch
//!
//! 写真を番号付きバッチとして Google Drive にアップロードし、
//! バッチ番号から WhatsApp（Twilio）で配信するツール
//!
//! クリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: バッチ番号・写真・配信先などのエンティティとリポジトリトレイト（外部依存なし）
//! - **Application層**: アップロード・配信・認証のユースケース
//! - **Adapter層**: 外部システムとの統合（Google Drive, Twilio, OAuth, ファイルシステム）
//! - **Driver層**: CLI、対話プロンプト、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
// カバレッジ計測時に外部サービス依存コードを除外するために使用
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
