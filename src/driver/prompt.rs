//! Line Prompt
//!
//! 対話入力の抽象化（テストでは入力をスクリプト化する）

use anyhow::{Context, Result};
use dialoguer::Input;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// 1行入力のプロンプト
pub trait LinePrompt {
    /// プロンプトを表示して1行読む（入力終端なら `None`）
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// 端末ならdialoguer、パイプ入力なら標準入力を使うプロンプトを返す
pub fn interactive() -> Box<dyn LinePrompt> {
    if io::stdin().is_terminal() {
        Box::new(DialoguerPrompt)
    } else {
        Box::new(StdinPrompt::new(io::stdin().lock()))
    }
}

/// dialoguer による端末プロンプト
pub struct DialoguerPrompt;

impl LinePrompt for DialoguerPrompt {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let result = Input::<String>::new()
            .with_prompt(prompt.trim_end_matches([':', ' ']))
            .allow_empty(true)
            .interact_text();

        match result {
            Ok(line) => Ok(Some(line)),
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }
}

/// 行単位のリーダーから読むプロンプト
pub struct StdinPrompt<R: BufRead> {
    reader: R,
}

impl<R: BufRead> StdinPrompt<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LinePrompt for StdinPrompt<R> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        println!("{}", prompt);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .context("Failed to read input")?;
        if n == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// 事前に用意した入力を順に返すプロンプト
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    lines: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// 表示されたプロンプトの履歴
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl LinePrompt for ScriptedPrompt {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.asked.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
