//! Drive API Wire Models
//!
//! Drive v3 REST のリクエスト・レスポンス

use serde::{Deserialize, Serialize};

/// `files.create` のメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub parents: Vec<String>,
}

/// `files` リソース（要求したフィールドのみ）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileResource {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `files.list` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<FileResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// `permissions.create` のリクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRequest {
    pub role: String,
    #[serde(rename = "type")]
    pub grantee_type: String,
}

impl PermissionRequest {
    /// 誰でも閲覧可能
    pub fn anyone_reader() -> Self {
        Self {
            role: "reader".to_string(),
            grantee_type: "anyone".to_string(),
        }
    }
}
