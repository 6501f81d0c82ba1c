//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};

/// 写真をバッチ単位でGoogle Driveにアップロードし、WhatsAppで配信するCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "photobatch")]
#[command(about = "Upload photo batches to Google Drive and send them over WhatsApp", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, default_value = "./photobatch.json")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upload photos (a file or a folder) as numbered batches
    Upload,
    /// Send a batch of photos to a phone number
    Send,
}
