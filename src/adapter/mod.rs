//! Adapter Layer
//!
//! 外部システム（Google Drive, Twilio, ファイルシステム）との統合

pub mod auth;
pub mod config;
pub mod drive;
pub mod error;
pub mod repositories;
pub mod twilio;
