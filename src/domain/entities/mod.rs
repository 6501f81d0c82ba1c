//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **BatchNumber / BatchSequencer**: バッチ番号と払い出し
//! - **Photo / RemoteObject / FilePage**: ローカル写真とリモートオブジェクト
//! - **PhoneRecipient**: 配信先の電話番号

pub mod batch;
pub mod photo;
pub mod recipient;
