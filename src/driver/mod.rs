//! # Driver Layer (Presentation)
//!
//! CLIや対話プロンプトを提供
//!
//! ## 特徴
//!
//! - Use Caseを呼び出して対話ループを回す
//! - 依存性注入（DI）を行い、全てを組み立てる
//!
//! ## 構成要素
//!
//! - **cli**: CLI引数のパース
//! - **prompt**: 1行入力の抽象化
//! - **workflow**: アップローダー・送信機のループと組み立て

pub mod cli;
pub mod prompt;
pub mod workflow;

pub use cli::{Args, Command};
pub use workflow::{run_send, run_upload, SenderWorkflow, UploaderWorkflow};
