//! Google OAuth2 Flow
//!
//! インストールアプリ向けの同意フロー（ループバックリダイレクト）とトークン更新

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::{Duration, Utc};
use log::{debug, info, warn};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::client_secrets::ClientSecrets;
use crate::adapter::error::{check_status, CredentialError};
use crate::domain::repositories::credential_repository::{AuthorizationFlow, Credential};

const SERVICE: &str = "OAuth";
const SUCCESS_PAGE: &str =
    "The authentication flow has completed. You may close this window.";
const FAILURE_PAGE: &str = "The authentication flow failed. Return to the terminal.";

/// トークンエンドポイントのレスポンス
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Google OAuth2 フロー
pub struct GoogleOAuthFlow {
    http: Client,
    client_secrets_path: PathBuf,
    scope: String,
}

impl GoogleOAuthFlow {
    pub fn new(http: Client, client_secrets_path: PathBuf, scope: &str) -> Self {
        Self {
            http,
            client_secrets_path,
            scope: scope.to_string(),
        }
    }

    pub fn connect(client_secrets_path: PathBuf, scope: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client for OAuth")?;
        Ok(Self::new(http, client_secrets_path, scope))
    }

    /// Build the consent page URL
    pub fn authorization_url(
        secrets: &ClientSecrets,
        redirect_uri: &str,
        state: &str,
        scope: &str,
    ) -> Result<Url> {
        Url::parse_with_params(
            &secrets.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", secrets.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", scope),
                ("state", state),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .context("Invalid auth_uri in client secrets")
    }

    async fn request_token(&self, token_uri: &str, form: &[(&str, &str)]) -> Result<TokenResponse> {
        debug!("POST {}", token_uri);

        let response = self
            .http
            .post(token_uri)
            .form(form)
            .send()
            .await
            .context("Failed to send token request")?;

        let response = check_status(SERVICE, response).await?;
        response
            .json()
            .await
            .context("Failed to parse token response")
    }

    /// Exchange an authorization code for a credential
    pub async fn exchange_code(
        &self,
        secrets: &ClientSecrets,
        code: &str,
        redirect_uri: &str,
    ) -> Result<Credential> {
        let response = self
            .request_token(
                &secrets.token_uri,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("client_id", secrets.client_id.as_str()),
                    ("client_secret", secrets.client_secret.as_str()),
                    ("redirect_uri", redirect_uri),
                ],
            )
            .await?;

        Ok(Credential {
            token: response.access_token,
            refresh_token: response.refresh_token,
            token_uri: secrets.token_uri.clone(),
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            scopes: scopes_from(response.scope.as_deref(), &[self.scope.clone()]),
            expiry: response
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }
}

/// Split a space-delimited scope string, falling back to `previous`
fn scopes_from(scope: Option<&str>, previous: &[String]) -> Vec<String> {
    match scope {
        Some(scope) if !scope.trim().is_empty() => {
            scope.split_whitespace().map(|s| s.to_string()).collect()
        }
        _ => previous.to_vec(),
    }
}

/// Parse the query of the loopback redirect
///
/// `state` is checked before `error` and `code`.
pub fn parse_redirect(
    params: &HashMap<String, String>,
    expected_state: &str,
) -> Result<String, CredentialError> {
    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Err(CredentialError::StateMismatch);
    }

    if let Some(error) = params.get("error") {
        return Err(CredentialError::ConsentDenied(error.clone()));
    }

    params.get("code").cloned().ok_or(CredentialError::MissingCode)
}

type RedirectOutcome = Result<String, CredentialError>;

/// リダイレクト受信ハンドラの共有状態
#[derive(Clone)]
struct RedirectState {
    expected_state: Arc<str>,
    outcome: Arc<Mutex<Option<oneshot::Sender<RedirectOutcome>>>>,
}

async fn receive_redirect(
    State(state): State<RedirectState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, &'static str) {
    let outcome = parse_redirect(&params, &state.expected_state);
    if let Err(CredentialError::StateMismatch) = outcome {
        warn!("Ignoring redirect with an unexpected state");
        return (StatusCode::BAD_REQUEST, FAILURE_PAGE);
    }

    let page = match outcome {
        Ok(_) => (StatusCode::OK, SUCCESS_PAGE),
        Err(_) => (StatusCode::BAD_REQUEST, FAILURE_PAGE),
    };

    let sender = state.outcome.lock().ok().and_then(|mut slot| slot.take());
    if let Some(sender) = sender {
        let _ = sender.send(outcome);
    }

    page
}

/// Serve the loopback redirect until a request with the expected state arrives
pub async fn wait_for_code(listener: TcpListener, expected_state: &str) -> Result<String> {
    let (outcome_tx, outcome_rx) = oneshot::channel();
    let state = RedirectState {
        expected_state: Arc::from(expected_state),
        outcome: Arc::new(Mutex::new(Some(outcome_tx))),
    };
    let app = Router::new()
        .route("/", get(receive_redirect))
        .with_state(state);

    if let Ok(addr) = listener.local_addr() {
        debug!("Waiting for redirect on {}", addr);
    }

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let outcome = outcome_rx.await;
    let _ = shutdown_tx.send(());
    server
        .await
        .context("Redirect listener task failed")?
        .context("Redirect listener failed")?;

    let code = outcome.context("Redirect listener stopped before the redirect arrived")??;
    Ok(code)
}

#[async_trait]
impl AuthorizationFlow for GoogleOAuthFlow {
    async fn refresh(&self, credential: &Credential) -> Result<Credential> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .context("Credential has no refresh token")?;

        let response = self
            .request_token(
                &credential.token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", credential.client_id.as_str()),
                    ("client_secret", credential.client_secret.as_str()),
                ],
            )
            .await?;

        info!("Refreshed access token");

        Ok(Credential {
            token: response.access_token,
            refresh_token: response
                .refresh_token
                .or_else(|| credential.refresh_token.clone()),
            token_uri: credential.token_uri.clone(),
            client_id: credential.client_id.clone(),
            client_secret: credential.client_secret.clone(),
            scopes: scopes_from(response.scope.as_deref(), &credential.scopes),
            expiry: response
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }

    async fn authorize(&self) -> Result<Credential> {
        let secrets = ClientSecrets::load(&self.client_secrets_path)?;

        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .context("Failed to bind loopback listener")?;
        let port = listener
            .local_addr()
            .context("Failed to read loopback address")?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{}/", port);
        let state = Uuid::new_v4().to_string();

        let url = Self::authorization_url(&secrets, &redirect_uri, &state, &self.scope)?;
        println!("Please visit this URL to authorize this application: {}", url);

        let code = wait_for_code(listener, &state).await?;
        self.exchange_code(&secrets, &code, &redirect_uri).await
    }
}
