//! # Domain Layer
//!
//! このモジュールはビジネスの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - HTTPやファイル形式について何も知らない
//! - フレームワークに依存しない
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（BatchNumber, Photoなど）
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（ビジネスルール）
//! - **errors**: ドメイン固有のエラー

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
