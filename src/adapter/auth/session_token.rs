//! Session Token
//!
//! セッション中のアクセストークンを保持し、期限切れ時に更新・保存する

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::repositories::credential_repository::{
    AuthorizationFlow, Credential, CredentialRepository,
};

/// 更新に使うフローと保存先
struct Renewal {
    flow: Arc<dyn AuthorizationFlow>,
    store: Arc<dyn CredentialRepository>,
}

/// 1回の実行を通して使うアクセストークン
pub struct SessionToken {
    credential: Mutex<Credential>,
    renewal: Option<Renewal>,
}

impl SessionToken {
    /// 期限切れになったら `flow` で更新し、`store` に保存するトークン
    pub fn renewable(
        credential: Credential,
        flow: Arc<dyn AuthorizationFlow>,
        store: Arc<dyn CredentialRepository>,
    ) -> Self {
        Self {
            credential: Mutex::new(credential),
            renewal: Some(Renewal { flow, store }),
        }
    }

    /// 更新しない固定トークン
    pub fn fixed(access_token: &str) -> Self {
        Self {
            credential: Mutex::new(Credential {
                token: access_token.to_string(),
                refresh_token: None,
                token_uri: String::new(),
                client_id: String::new(),
                client_secret: String::new(),
                scopes: Vec::new(),
                expiry: None,
            }),
            renewal: None,
        }
    }

    /// 現在使えるアクセストークン
    pub async fn access_token(&self) -> Result<String> {
        self.access_token_at(Utc::now()).await
    }

    /// 指定時刻を基準に `access_token` を実行する
    pub async fn access_token_at(&self, now: DateTime<Utc>) -> Result<String> {
        let mut credential = self.credential.lock().await;

        if credential.is_expired_at(now) && credential.can_refresh() {
            if let Some(renewal) = &self.renewal {
                info!("Access token expired, refreshing");
                let fresh = Self::renew(renewal, &credential).await?;
                *credential = fresh;
            }
        }

        Ok(credential.token.clone())
    }

    /// サーバーに `rejected` を拒否された後のトークン
    ///
    /// 既に別の呼び出しで更新済みならそのトークンを、更新できなければ `None` を返す
    pub async fn renew_rejected(&self, rejected: &str) -> Result<Option<String>> {
        let Some(renewal) = &self.renewal else {
            return Ok(None);
        };
        let mut credential = self.credential.lock().await;

        if credential.token != rejected {
            return Ok(Some(credential.token.clone()));
        }
        if !credential.can_refresh() {
            return Ok(None);
        }

        info!("Access token rejected, refreshing");
        let fresh = Self::renew(renewal, &credential).await?;
        *credential = fresh;

        Ok(Some(credential.token.clone()))
    }

    async fn renew(renewal: &Renewal, credential: &Credential) -> Result<Credential> {
        let fresh = renewal
            .flow
            .refresh(credential)
            .await
            .context("Failed to refresh access token")?;
        renewal
            .store
            .save(&fresh)
            .await
            .context("Failed to save refreshed credentials")?;
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use mockall::predicate::function;

    use crate::domain::repositories::credential_repository::{
        MockAuthorizationFlow, MockCredentialRepository,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn credential(token: &str, expiry: DateTime<Utc>) -> Credential {
        Credential {
            token: token.to_string(),
            refresh_token: Some("1//refresh".to_string()),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/drive".to_string()],
            expiry: Some(expiry),
        }
    }

    #[tokio::test]
    async fn test_valid_token_is_not_refreshed() {
        let session = SessionToken::renewable(
            credential("live", now() + Duration::hours(1)),
            Arc::new(MockAuthorizationFlow::new()),
            Arc::new(MockCredentialRepository::new()),
        );

        assert_eq!(session.access_token_at(now()).await.unwrap(), "live");
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_saved_once() {
        let mut flow = MockAuthorizationFlow::new();
        flow.expect_refresh()
            .with(function(|c: &Credential| c.token == "stale"))
            .times(1)
            .returning(|_| Ok(credential("fresh", now() + Duration::hours(1))));

        let mut store = MockCredentialRepository::new();
        store
            .expect_save()
            .with(function(|c: &Credential| c.token == "fresh"))
            .times(1)
            .returning(|_| Ok(()));

        let session = SessionToken::renewable(
            credential("stale", now() - Duration::hours(2)),
            Arc::new(flow),
            Arc::new(store),
        );

        assert_eq!(session.access_token_at(now()).await.unwrap(), "fresh");
        assert_eq!(session.access_token_at(now()).await.unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_refresh_failure_propagates() {
        let mut flow = MockAuthorizationFlow::new();
        flow.expect_refresh()
            .returning(|_| Err(anyhow::anyhow!("invalid_grant")));

        let session = SessionToken::renewable(
            credential("stale", now() - Duration::hours(2)),
            Arc::new(flow),
            Arc::new(MockCredentialRepository::new()),
        );

        assert!(session.access_token_at(now()).await.is_err());
    }

    #[tokio::test]
    async fn test_renew_rejected_skips_when_already_renewed() {
        let mut flow = MockAuthorizationFlow::new();
        flow.expect_refresh()
            .times(1)
            .returning(|_| Ok(credential("fresh", now() + Duration::hours(1))));
        let mut store = MockCredentialRepository::new();
        store.expect_save().times(1).returning(|_| Ok(()));

        let session = SessionToken::renewable(
            credential("revoked", now() + Duration::hours(1)),
            Arc::new(flow),
            Arc::new(store),
        );

        assert_eq!(
            session.renew_rejected("revoked").await.unwrap().as_deref(),
            Some("fresh")
        );
        assert_eq!(
            session.renew_rejected("revoked").await.unwrap().as_deref(),
            Some("fresh")
        );
    }

    #[tokio::test]
    async fn test_fixed_token_never_renews() {
        let session = SessionToken::fixed("tok");

        assert_eq!(session.access_token().await.unwrap(), "tok");
        assert_eq!(session.renew_rejected("tok").await.unwrap(), None);
    }
}
