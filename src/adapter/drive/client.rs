//! Drive REST Client
//!
//! 認証済みセッションとして Drive v3 REST API を呼び出す

use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;

use super::models::{FileList, FileMetadata, FileResource, PermissionRequest};
use crate::adapter::auth::session_token::SessionToken;
use crate::adapter::error::{check_status, GatewayError};
use crate::domain::repositories::credential_repository::{
    AuthorizationFlow, Credential, CredentialRepository,
};

/// Full read/write access to the Drive account
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const SERVICE: &str = "Drive";
const LIST_FIELDS: &str = "nextPageToken, files(id, name)";

/// Drive session reused for every call in a run
pub struct DriveClient {
    http: Client,
    api_base: String,
    session: Arc<SessionToken>,
}

impl DriveClient {
    /// 固定トークンのセッション
    pub fn new(http: Client, api_base: &str, access_token: &str) -> Self {
        Self::with_session(http, api_base, Arc::new(SessionToken::fixed(access_token)))
    }

    pub fn with_session(http: Client, api_base: &str, session: Arc<SessionToken>) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Open a session from a credential carrying the full Drive scope
    ///
    /// The access token is refreshed through `flow` and saved to `store`
    /// whenever it expires or is rejected.
    pub fn open_session(
        api_base: &str,
        credential: Credential,
        flow: Arc<dyn AuthorizationFlow>,
        store: Arc<dyn CredentialRepository>,
    ) -> Result<Self> {
        if !credential.has_scope(DRIVE_SCOPE) {
            bail!("Credential does not grant {}", DRIVE_SCOPE);
        }

        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client for Drive API")?;
        let session = SessionToken::renewable(credential, flow, store);

        Ok(Self::with_session(http, api_base, Arc::new(session)))
    }

    /// Send with the current token, renewing it once on 401
    async fn send_authorized<F>(&self, action: &str, build: F) -> Result<Response>
    where
        F: Fn(&str) -> RequestBuilder,
    {
        let token = self.session.access_token().await?;
        let response = build(&token)
            .send()
            .await
            .with_context(|| format!("Failed to send Drive {} request", action))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(check_status(SERVICE, response).await?);
        }

        let Some(renewed) = self.session.renew_rejected(&token).await? else {
            return Ok(check_status(SERVICE, response).await?);
        };

        debug!("Retrying Drive {} request with a renewed token", action);
        let response = build(&renewed)
            .send()
            .await
            .with_context(|| format!("Failed to send Drive {} request", action))?;

        Ok(check_status(SERVICE, response).await?)
    }

    /// `files.create` without media (folders)
    pub async fn create_file(&self, metadata: &FileMetadata) -> Result<FileResource> {
        let url = format!("{}/drive/v3/files", self.api_base);
        debug!("POST {} name={}", url, metadata.name);

        let response = self
            .send_authorized("create", |token| {
                self.http
                    .post(&url)
                    .bearer_auth(token)
                    .query(&[("fields", "id")])
                    .json(metadata)
            })
            .await?;

        response
            .json()
            .await
            .context("Failed to parse Drive create response")
    }

    /// `files.create` with media using the resumable protocol
    pub async fn upload(
        &self,
        metadata: &FileMetadata,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<FileResource> {
        let url = format!("{}/upload/drive/v3/files", self.api_base);
        debug!(
            "POST {} name={} ({} bytes, {})",
            url,
            metadata.name,
            content.len(),
            content_type
        );

        let response = self
            .send_authorized("upload", |token| {
                self.http
                    .post(&url)
                    .bearer_auth(token)
                    .query(&[("uploadType", "resumable"), ("fields", "id")])
                    .header("X-Upload-Content-Type", content_type)
                    .header("X-Upload-Content-Length", content.len().to_string())
                    .json(metadata)
            })
            .await?;

        let session_uri = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
            .ok_or(GatewayError::MissingField {
                service: SERVICE,
                field: "Location",
            })?;

        let response = self
            .send_authorized("upload content", |token| {
                self.http
                    .put(&session_uri)
                    .bearer_auth(token)
                    .header(CONTENT_TYPE, content_type)
                    .body(content.clone())
            })
            .await?;

        response
            .json()
            .await
            .context("Failed to parse Drive upload response")
    }

    /// `files.list` for one page
    pub async fn list(&self, q: &str, page_token: Option<&str>) -> Result<FileList> {
        let url = format!("{}/drive/v3/files", self.api_base);
        debug!("GET {} q={} pageToken={:?}", url, q, page_token);

        let response = self
            .send_authorized("list", |token| {
                let request = self
                    .http
                    .get(&url)
                    .bearer_auth(token)
                    .query(&[("q", q), ("spaces", "drive"), ("fields", LIST_FIELDS)]);
                match page_token {
                    Some(page_token) => request.query(&[("pageToken", page_token)]),
                    None => request,
                }
            })
            .await?;

        response
            .json()
            .await
            .context("Failed to parse Drive list response")
    }

    /// `permissions.create`
    pub async fn create_permission(
        &self,
        file_id: &str,
        permission: &PermissionRequest,
    ) -> Result<()> {
        let url = format!("{}/drive/v3/files/{}/permissions", self.api_base, file_id);
        debug!("POST {} role={}", url, permission.role);

        self.send_authorized("permission", |token| {
            self.http.post(&url).bearer_auth(token).json(permission)
        })
        .await?;
        Ok(())
    }
}
