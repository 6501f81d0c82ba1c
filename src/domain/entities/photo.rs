//! # Photo Entity
//!
//! ローカルの写真ファイルと、アップロード後のリモートオブジェクト

use std::path::{Path, PathBuf};

/// 推論できない拡張子に使うコンテンツタイプ
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// 拡張子からコンテンツタイプを推論する
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// アップロード対象のローカル写真
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    path: PathBuf,
    name: String,
    content_type: &'static str,
}

impl Photo {
    /// パスから写真を作成（名前はファイル名、コンテンツタイプは拡張子から推論）
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let content_type = content_type_for(&path);

        Self {
            path,
            name,
            content_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// リモート側でのオブジェクト名
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// ストレージ上のオブジェクト（ファイルまたはフォルダ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub id: String,
    pub name: Option<String>,
}

impl RemoteObject {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }
}

/// ページングされた一覧結果の1ページ
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilePage {
    pub files: Vec<RemoteObject>,
    /// 続きがある場合のみ `Some`
    pub next_page_token: Option<String>,
}
