//! JSON Credential Repository Implementation
//!
//! CredentialRepositoryのJSON実装（認証情報をトークンファイルで永続化）

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::repositories::credential_repository::{Credential, CredentialRepository};

/// JSONファイルベースの認証情報リポジトリ
pub struct JsonCredentialRepository {
    path: PathBuf,
}

/// トークンファイル（authorized user 形式）の内部表現
#[derive(Debug, Deserialize, Serialize)]
struct TokenJson {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    token_uri: String,
    client_id: String,
    client_secret: String,
    #[serde(default)]
    scopes: Vec<String>,
    #[serde(default)]
    expiry: Option<DateTime<Utc>>,
}

impl JsonCredentialRepository {
    /// 新しいリポジトリを作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// ファイルから読み込む（同期処理）
    fn load_sync(path: &Path) -> Result<Option<TokenJson>> {
        if !path.exists() {
            info!("No token file found at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path).context("Failed to read token file")?;
        let token: TokenJson =
            serde_json::from_str(&content).context("Failed to parse token JSON")?;

        Ok(Some(token))
    }

    /// ファイルに保存する（同期処理）
    fn save_sync(path: &Path, token: &TokenJson) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create token directory")?;
            }
        }

        let json = serde_json::to_string_pretty(token).context("Failed to serialize token")?;
        fs::write(path, json).context("Failed to write token file")?;

        info!("Saved credentials to {}", path.display());
        Ok(())
    }

    /// JSON形式からDomain形式に変換
    fn to_domain(token: TokenJson) -> Credential {
        Credential {
            token: token.token,
            refresh_token: token.refresh_token,
            token_uri: token.token_uri,
            client_id: token.client_id,
            client_secret: token.client_secret,
            scopes: token.scopes,
            expiry: token.expiry,
        }
    }

    /// Domain形式からJSON形式に変換
    fn from_domain(credential: &Credential) -> TokenJson {
        TokenJson {
            token: credential.token.clone(),
            refresh_token: credential.refresh_token.clone(),
            token_uri: credential.token_uri.clone(),
            client_id: credential.client_id.clone(),
            client_secret: credential.client_secret.clone(),
            scopes: credential.scopes.clone(),
            expiry: credential.expiry,
        }
    }
}

#[async_trait]
impl CredentialRepository for JsonCredentialRepository {
    async fn load(&self) -> Result<Option<Credential>> {
        let path = self.path.clone();
        let token = tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(token.map(Self::to_domain))
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        let path = self.path.clone();
        let token = Self::from_domain(credential);
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &token))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_nonexistent_file() {
        let result = JsonCredentialRepository::load_sync(Path::new("/nonexistent/token.json"));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_load_authorized_user_file() {
        let mut file = NamedTempFile::new().unwrap();
        let json = r#"{
            "token": "ya29.access",
            "refresh_token": "1//refresh",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "client.apps.googleusercontent.com",
            "client_secret": "secret",
            "scopes": ["https://www.googleapis.com/auth/drive"],
            "expiry": "2022-07-06T04:31:12.123456Z",
            "universe_domain": "googleapis.com"
        }"#;
        file.write_all(json.as_bytes()).unwrap();

        let token = JsonCredentialRepository::load_sync(file.path())
            .unwrap()
            .unwrap();

        assert_eq!(token.token, "ya29.access");
        assert_eq!(token.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(token.scopes, vec!["https://www.googleapis.com/auth/drive"]);
        assert_eq!(
            token.expiry.unwrap().timestamp(),
            Utc.with_ymd_and_hms(2022, 7, 6, 4, 31, 12).unwrap().timestamp()
        );
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        assert!(JsonCredentialRepository::load_sync(file.path()).is_err());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("token.json");
        let repository = JsonCredentialRepository::new(&path);

        let credential = Credential {
            token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/drive".to_string()],
            expiry: Some(Utc.with_ymd_and_hms(2024, 12, 25, 10, 0, 0).unwrap()),
        };

        repository.save(&credential).await.unwrap();
        let loaded = repository.load().await.unwrap();

        assert_eq!(loaded, Some(credential));
    }
}
