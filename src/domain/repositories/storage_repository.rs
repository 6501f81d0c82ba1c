//! # Storage Repository Trait
//!
//! クラウドストレージ（フォルダ作成・アップロード・一覧・権限変更）を抽象化

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::photo::{FilePage, Photo, RemoteObject};

/// 一覧取得の検索条件
///
/// プロバイダ固有のクエリ言語への変換はAdapter層が行う
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileQuery {
    /// ゴミ箱に入っていない、指定名と完全一致するフォルダ（親は問わない）
    FoldersNamed(String),
    /// 指定フォルダ直下のオブジェクト
    ChildrenOf(String),
}

/// ストレージリポジトリ
///
/// 1回の実行を通して使い回される認証済みセッション
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// フォルダを作成する
    ///
    /// # Returns
    ///
    /// 作成されたフォルダのID
    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String>;

    /// ファイルをアップロードする
    ///
    /// # Returns
    ///
    /// 生成されたオブジェクトのID
    async fn upload_file(&self, photo: &Photo, parent_id: &str) -> Result<String>;

    /// 一覧を1ページ取得する
    ///
    /// # Arguments
    ///
    /// * `query` - 検索条件
    /// * `page_token` - 前ページの継続トークン（先頭ページは `None`）
    async fn list_files(&self, query: &FileQuery, page_token: Option<String>) -> Result<FilePage>;

    /// 誰でも閲覧可能（reader / anyone）な権限を付与する
    async fn grant_public_read(&self, file_id: &str) -> Result<()>;
}

/// 全ページを辿って一覧を取得する
///
/// 継続トークンが返らなくなった時点で終了する
pub async fn list_all<S: StorageRepository + ?Sized>(
    storage: &S,
    query: &FileQuery,
) -> Result<Vec<RemoteObject>> {
    let mut objects = Vec::new();
    let mut page_token = None;

    loop {
        let page = storage.list_files(query, page_token).await?;
        objects.extend(page.files);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(objects)
}
