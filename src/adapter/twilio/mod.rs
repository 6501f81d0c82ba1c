//! Twilio Adapter Modules
//!
//! メッセージ送信のためのアダプターモジュール

pub mod client;
pub mod credentials;
