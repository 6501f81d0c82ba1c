//! Adapter Errors
//!
//! 外部APIとの通信で発生するエラー

use thiserror::Error;

/// 外部API呼び出しのエラー
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 2xx以外のステータス
    #[error("{service} request failed with status {status}: {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// レスポンスに必要な値が無い
    #[error("{service} response is missing `{field}`")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },
}

/// 認証フローのエラー
#[derive(Debug, Error)]
pub enum CredentialError {
    /// クライアントシークレットファイルに必要なセクションが無い
    #[error("client secrets file has no `installed` or `web` section")]
    MalformedClientSecrets,

    /// ユーザーが同意しなかった
    #[error("authorization was denied: {0}")]
    ConsentDenied(String),

    /// リダイレクトの state が一致しない
    #[error("authorization response state does not match the request")]
    StateMismatch,

    /// リダイレクトに認可コードが含まれていない
    #[error("authorization response has no code")]
    MissingCode,
}

/// レスポンスのステータスを確認し、失敗なら `GatewayError::Http` を返す
pub async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Http {
        service,
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = GatewayError::Http {
            service: "Drive",
            status: 404,
            body: "File not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Drive request failed with status 404: File not found"
        );
    }

    #[test]
    fn test_missing_field_message() {
        let err = GatewayError::MissingField {
            service: "Drive",
            field: "Location",
        };
        assert_eq!(err.to_string(), "Drive response is missing `Location`");
    }
}
