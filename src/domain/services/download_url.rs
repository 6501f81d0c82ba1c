//! # Download URL Service
//!
//! オブジェクトIDから公開ダウンロードURLを組み立てる

use crate::domain::entities::photo::RemoteObject;

/// 公開ダウンロードURLの組み立て
pub struct DownloadUrlService;

impl DownloadUrlService {
    /// `https://<storage-host>/uc?id=<objectId>&export=download` を返す
    ///
    /// ```
    /// use photobatch::domain::services::download_url::DownloadUrlService;
    ///
    /// let url = DownloadUrlService::build("drive.google.com", "id1");
    /// assert_eq!(url, "https://drive.google.com/uc?id=id1&export=download");
    /// ```
    pub fn build(storage_host: &str, object_id: &str) -> String {
        format!(
            "https://{}/uc?id={}&export=download",
            storage_host, object_id
        )
    }

    /// オブジェクトの並び順を保ったままURLを組み立てる
    pub fn build_all(storage_host: &str, objects: &[RemoteObject]) -> Vec<String> {
        objects
            .iter()
            .map(|object| Self::build(storage_host, &object.id))
            .collect()
    }
}
