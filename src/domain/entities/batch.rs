//! # Batch Entity
//!
//! バッチ番号と、実行ごとのバッチ番号シーケンサー

use std::fmt;

/// バッチ番号
///
/// リモート側ではこの番号の10進文字列を名前に持つフォルダとして表現される
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchNumber(u32);

impl BatchNumber {
    /// 新しいバッチ番号を作成
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// 数値を返す
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// バッチフォルダ名（番号の10進文字列）
    pub fn folder_name(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for BatchNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BatchNumber {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// バッチシーケンサー
///
/// 実行ごとに構築され、アップロードオーケストレーターに渡される。
/// 永続化はしないため、プロセスを再起動すると番号は開始値に戻る。
/// 単一スレッドからの利用のみを想定している。
#[derive(Debug, Clone)]
pub struct BatchSequencer {
    next: u32,
}

impl BatchSequencer {
    /// 1から始まるシーケンサーを作成
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// 任意の開始値から始まるシーケンサーを作成
    pub fn starting_at(start: u32) -> Self {
        Self { next: start }
    }

    /// 次に払い出される番号を返す（消費しない）
    pub fn peek(&self) -> BatchNumber {
        BatchNumber(self.next)
    }

    /// 現在の番号を返してからインクリメントする
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> BatchNumber {
        let current = BatchNumber(self.next);
        self.next += 1;
        current
    }
}

impl Default for BatchSequencer {
    fn default() -> Self {
        Self::new()
    }
}
