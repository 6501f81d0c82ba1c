//! Drive Query Builder
//!
//! `FileQuery` を Drive v3 の `q` パラメータに変換する

use crate::domain::repositories::storage_repository::FileQuery;

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Escape a value for use inside a single-quoted query literal
pub fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Render a query in the Drive search syntax
pub fn render(query: &FileQuery) -> String {
    match query {
        FileQuery::FoldersNamed(name) => format!(
            "mimeType='{}' and trashed=false and name='{}'",
            FOLDER_MIME_TYPE,
            escape_literal(name)
        ),
        FileQuery::ChildrenOf(parent_id) => {
            format!("'{}' in parents", escape_literal(parent_id))
        }
    }
}
