//! # Credential Repository Trait
//!
//! 認証情報の永続化と、取得・更新フローを抽象化

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

#[cfg(test)]
use mockall::automock;

/// 期限切れ判定に使う余裕時間（秒）
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// OAuth2 認証情報
///
/// ストレージセッションを開くために使う
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// アクセストークン
    pub token: String,
    /// リフレッシュトークン
    pub refresh_token: Option<String>,
    /// トークンエンドポイント
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    /// 許可されたスコープ
    pub scopes: Vec<String>,
    /// アクセストークンの有効期限
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    /// 指定時刻の時点で期限切れかどうか
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS),
            None => false,
        }
    }

    /// 指定時刻の時点でそのまま使えるかどうか
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && !self.is_expired_at(now)
    }

    /// リフレッシュ可能かどうか
    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// 指定スコープが許可されているかどうか
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// 認証情報リポジトリ
///
/// トークンファイルへの読み書きを担当する
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// 保存済みの認証情報を読み込む（未保存なら `None`）
    async fn load(&self) -> Result<Option<Credential>>;

    /// 認証情報を保存する
    async fn save(&self, credential: &Credential) -> Result<()>;
}

/// 認可フロー
///
/// リフレッシュと対話的な同意フローを担当する
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// リフレッシュトークンで認証情報を更新する
    async fn refresh(&self, credential: &Credential) -> Result<Credential>;

    /// 対話的な同意フローで新しい認証情報を取得する
    async fn authorize(&self) -> Result<Credential>;
}
