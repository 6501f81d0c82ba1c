//! # Domain Services
//!
//! 特定のエンティティに属さないビジネスルール

pub mod download_url;
