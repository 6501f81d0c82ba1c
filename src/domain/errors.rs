//! # Domain Errors
//!
//! ドメイン固有のエラー

use thiserror::Error;

/// バッチ番号からフォルダを解決する際のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchLookupError {
    /// 一致するフォルダが存在しない
    #[error("no folder named '{0}' was found")]
    NotFound(String),

    /// 同名のフォルダが複数存在する
    #[error("batch '{name}' matches {} folders: {}", ids.len(), ids.join(", "))]
    Ambiguous { name: String, ids: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = BatchLookupError::NotFound("7".to_string());
        assert_eq!(err.to_string(), "no folder named '7' was found");
    }

    #[test]
    fn test_ambiguous_message_lists_ids() {
        let err = BatchLookupError::Ambiguous {
            name: "3".to_string(),
            ids: vec!["F3a".to_string(), "F3b".to_string()],
        };
        assert_eq!(err.to_string(), "batch '3' matches 2 folders: F3a, F3b");
    }
}
