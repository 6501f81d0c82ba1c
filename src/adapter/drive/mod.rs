//! Google Drive Adapter Modules
//!
//! Google Drive 統合のためのアダプターモジュール

pub mod client;
pub mod models;
pub mod query;
