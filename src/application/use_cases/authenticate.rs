//! # Authenticate Use Case
//!
//! 保存済み認証情報の読み込み・更新・新規取得

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::repositories::credential_repository::{
    AuthorizationFlow, Credential, CredentialRepository,
};

/// 認証ユースケース
pub struct AuthenticateUseCase<C: CredentialRepository, F: AuthorizationFlow> {
    credential_repository: Arc<C>,
    authorization_flow: Arc<F>,
    required_scope: String,
}

impl<C: CredentialRepository, F: AuthorizationFlow> AuthenticateUseCase<C, F> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `credential_repository` - トークンファイルのリポジトリ
    /// * `authorization_flow` - リフレッシュ・同意フロー
    /// * `required_scope` - セッションに必要なスコープ
    pub fn new(
        credential_repository: Arc<C>,
        authorization_flow: Arc<F>,
        required_scope: String,
    ) -> Self {
        Self {
            credential_repository,
            authorization_flow,
            required_scope,
        }
    }

    /// 使える認証情報を返す
    ///
    /// 保存済みで有効ならそのまま、期限切れでリフレッシュ可能なら更新、
    /// それ以外は同意フローを実行する。更新・新規取得した場合は保存する。
    pub async fn load_or_refresh_credentials(&self) -> Result<Credential> {
        self.load_or_refresh_at(Utc::now()).await
    }

    /// 指定時刻を基準に `load_or_refresh_credentials` を実行する
    pub async fn load_or_refresh_at(&self, now: DateTime<Utc>) -> Result<Credential> {
        let stored = self
            .credential_repository
            .load()
            .await
            .context("Failed to load stored credentials")?;

        let stored = stored.filter(|c| c.has_scope(&self.required_scope));

        if let Some(credential) = &stored {
            if credential.is_valid_at(now) {
                info!("Using stored credentials");
                return Ok(credential.clone());
            }
        }

        let fresh = match stored {
            Some(credential) if credential.can_refresh() => {
                info!("Stored credentials expired, refreshing");
                self.authorization_flow
                    .refresh(&credential)
                    .await
                    .context("Failed to refresh credentials")?
            }
            _ => {
                info!("No usable credentials, starting authorization flow");
                self.authorization_flow
                    .authorize()
                    .await
                    .context("Authorization flow failed")?
            }
        };

        self.credential_repository
            .save(&fresh)
            .await
            .context("Failed to save credentials")?;

        Ok(fresh)
    }
}
