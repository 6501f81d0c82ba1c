//! Photobatch - Photo Batch Uploader / Sender
//!
//! 写真バッチを Google Drive にアップロードし、WhatsApp で配信

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use photobatch::adapter::config::Config;
use photobatch::driver::{run_send, run_upload, Args, Command};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    match args.command {
        Command::Upload => run_upload(config).await,
        Command::Send => run_send(config).await,
    }
}
