//! # Upload Batch Use Case
//!
//! 写真をバッチフォルダにまとめてアップロードするユースケース

use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::application::dto::reports::{UploadOutcome, UploadReport, UploadedPhoto};
use crate::application::dto::requests::UploadRequest;
use crate::domain::entities::batch::{BatchNumber, BatchSequencer};
use crate::domain::entities::photo::Photo;
use crate::domain::repositories::photo_repository::PhotoRepository;
use crate::domain::repositories::storage_repository::StorageRepository;

/// バッチアップロードユースケース
///
/// ルートフォルダ直下に番号付きフォルダを作成し、写真をアップロードする
pub struct UploadBatchUseCase<S: StorageRepository, P: PhotoRepository> {
    storage_repository: Arc<S>,
    photo_repository: Arc<P>,
    root_folder_id: String,
}

impl<S: StorageRepository, P: PhotoRepository> UploadBatchUseCase<S, P> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `storage_repository` - ストレージリポジトリ
    /// * `photo_repository` - 写真リポジトリ
    /// * `root_folder_id` - バッチフォルダの親フォルダID（固定設定）
    pub fn new(
        storage_repository: Arc<S>,
        photo_repository: Arc<P>,
        root_folder_id: String,
    ) -> Self {
        Self {
            storage_repository,
            photo_repository,
            root_folder_id,
        }
    }

    /// パスが既存のファイルかどうか
    pub fn is_legit_file(path: &Path) -> bool {
        path.is_file()
    }

    /// パスが既存のディレクトリかどうか
    pub fn is_legit_dir(path: &Path) -> bool {
        path.is_dir()
    }

    /// 次のバッチ番号でフォルダを作成する
    ///
    /// 番号はフォルダ作成に成功した場合のみ消費される
    ///
    /// # Returns
    ///
    /// (バッチ番号, フォルダID)
    pub async fn create_batch_folder(
        &self,
        sequencer: &mut BatchSequencer,
    ) -> Result<(BatchNumber, String)> {
        let batch = sequencer.peek();
        let folder_id = self
            .storage_repository
            .create_folder(&batch.folder_name(), &self.root_folder_id)
            .await
            .with_context(|| format!("Failed to create folder for batch {}", batch))?;
        sequencer.next();

        info!("Created batch folder {} ({})", batch, folder_id);
        Ok((batch, folder_id))
    }

    /// 1ファイルをアップロードする
    pub async fn upload_one(&self, path: &Path, folder_id: &str) -> Result<UploadedPhoto> {
        let photo = Photo::from_path(path);
        self.upload_photo(&photo, folder_id).await
    }

    /// ディレクトリ直下の全ファイルをアップロードする
    ///
    /// 1件でも失敗した時点で中断する
    pub async fn upload_many(&self, dir: &Path, folder_id: &str) -> Result<Vec<UploadedPhoto>> {
        let photos = self.photo_repository.discover_photos(dir).await?;

        let mut uploaded = Vec::with_capacity(photos.len());
        for photo in &photos {
            uploaded.push(self.upload_photo(photo, folder_id).await?);
        }

        Ok(uploaded)
    }

    async fn upload_photo(&self, photo: &Photo, folder_id: &str) -> Result<UploadedPhoto> {
        let object_id = self
            .storage_repository
            .upload_file(photo, folder_id)
            .await
            .with_context(|| format!("Failed to upload {}", photo.path().display()))?;

        info!("Uploaded {} as {}", photo.name(), object_id);
        Ok(UploadedPhoto {
            name: photo.name().to_string(),
            object_id,
        })
    }

    /// アップロード要求を1件処理する
    ///
    /// # Returns
    ///
    /// パスが存在しなければ `UploadOutcome::NotFound`（番号は消費しない）、
    /// 存在すればフォルダを1つ作成して全ファイルをアップロードした結果
    ///
    /// # Errors
    ///
    /// ストレージ呼び出しに失敗した場合にエラーを返す
    pub async fn execute(
        &self,
        request: &UploadRequest,
        sequencer: &mut BatchSequencer,
    ) -> Result<UploadOutcome> {
        let path = request.path.as_path();
        let is_file = Self::is_legit_file(path);

        if !is_file && !Self::is_legit_dir(path) {
            return Ok(UploadOutcome::NotFound(request.path.clone()));
        }

        let (batch, folder_id) = self.create_batch_folder(sequencer).await?;

        let photos = if is_file {
            vec![self.upload_one(path, &folder_id).await?]
        } else {
            self.upload_many(path, &folder_id).await?
        };

        Ok(UploadOutcome::Uploaded(UploadReport {
            batch,
            folder_id,
            photos,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    use crate::domain::repositories::storage_repository::MockStorageRepository;

    struct MockPhotoRepository {
        photos: Vec<PathBuf>,
    }

    #[async_trait]
    impl PhotoRepository for MockPhotoRepository {
        async fn discover_photos(&self, _dir: &Path) -> Result<Vec<Photo>> {
            Ok(self.photos.iter().map(Photo::from_path).collect())
        }
    }

    fn use_case(
        storage: MockStorageRepository,
        photos: Vec<PathBuf>,
    ) -> UploadBatchUseCase<MockStorageRepository, MockPhotoRepository> {
        UploadBatchUseCase::new(
            Arc::new(storage),
            Arc::new(MockPhotoRepository { photos }),
            "ROOT".to_string(),
        )
    }

    #[test]
    fn test_is_legit_file_and_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.jpg");
        fs::write(&file, b"jpeg").unwrap();
        let missing = temp_dir.path().join("missing.jpg");

        type UseCase = UploadBatchUseCase<MockStorageRepository, MockPhotoRepository>;

        assert!(UseCase::is_legit_file(&file));
        assert!(!UseCase::is_legit_dir(&file));
        assert!(UseCase::is_legit_dir(temp_dir.path()));
        assert!(!UseCase::is_legit_file(temp_dir.path()));
        assert!(!UseCase::is_legit_file(&missing));
        assert!(!UseCase::is_legit_dir(&missing));
    }

    #[tokio::test]
    async fn test_create_batch_folder_uses_sequencer() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_create_folder()
            .with(eq("1"), eq("ROOT"))
            .times(1)
            .returning(|_, _| Ok("F1".to_string()));
        storage
            .expect_create_folder()
            .with(eq("2"), eq("ROOT"))
            .times(1)
            .returning(|_, _| Ok("F2".to_string()));

        let use_case = use_case(storage, vec![]);
        let mut sequencer = BatchSequencer::new();

        let first = use_case.create_batch_folder(&mut sequencer).await.unwrap();
        let second = use_case.create_batch_folder(&mut sequencer).await.unwrap();

        assert_eq!(first, (BatchNumber::new(1), "F1".to_string()));
        assert_eq!(second, (BatchNumber::new(2), "F2".to_string()));
    }

    #[tokio::test]
    async fn test_create_batch_folder_failure_keeps_number() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_create_folder()
            .returning(|_, _| Err(anyhow::anyhow!("403 Forbidden")));

        let use_case = use_case(storage, vec![]);
        let mut sequencer = BatchSequencer::new();

        assert!(use_case.create_batch_folder(&mut sequencer).await.is_err());
        assert_eq!(sequencer.peek().value(), 1);
    }

    #[tokio::test]
    async fn test_execute_missing_path_does_not_consume_batch() {
        let storage = MockStorageRepository::new();
        let use_case = use_case(storage, vec![]);
        let mut sequencer = BatchSequencer::new();

        let request = UploadRequest::new("/definitely/not/here.jpg");
        let outcome = use_case.execute(&request, &mut sequencer).await.unwrap();

        assert_eq!(
            outcome,
            UploadOutcome::NotFound(PathBuf::from("/definitely/not/here.jpg"))
        );
        assert_eq!(sequencer.peek().value(), 1);
    }

    #[tokio::test]
    async fn test_execute_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.jpg");
        fs::write(&file, b"jpeg").unwrap();

        let mut storage = MockStorageRepository::new();
        storage
            .expect_create_folder()
            .times(1)
            .returning(|_, _| Ok("F1".to_string()));
        storage
            .expect_upload_file()
            .withf(|photo, parent| photo.name() == "a.jpg" && parent == "F1")
            .times(1)
            .returning(|_, _| Ok("obj-1".to_string()));

        let use_case = use_case(storage, vec![]);
        let mut sequencer = BatchSequencer::new();

        let request = UploadRequest::new(file.to_str().unwrap());
        let outcome = use_case.execute(&request, &mut sequencer).await.unwrap();

        match outcome {
            UploadOutcome::Uploaded(report) => {
                assert_eq!(report.batch, BatchNumber::new(1));
                assert_eq!(report.folder_id, "F1");
                assert_eq!(report.object_ids(), vec!["obj-1"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(sequencer.peek().value(), 2);
    }

    #[tokio::test]
    async fn test_execute_directory_uploads_every_photo() {
        let temp_dir = TempDir::new().unwrap();
        let photos = vec![
            temp_dir.path().join("a.jpg"),
            temp_dir.path().join("b.jpg"),
        ];

        let mut storage = MockStorageRepository::new();
        storage
            .expect_create_folder()
            .times(1)
            .returning(|_, _| Ok("F1".to_string()));
        storage
            .expect_upload_file()
            .withf(|_, parent| parent == "F1")
            .times(2)
            .returning(|photo, _| Ok(format!("id-{}", photo.name())));

        let use_case = use_case(storage, photos);
        let mut sequencer = BatchSequencer::new();

        let request = UploadRequest::new(temp_dir.path().to_str().unwrap());
        let outcome = use_case.execute(&request, &mut sequencer).await.unwrap();

        match outcome {
            UploadOutcome::Uploaded(report) => {
                assert_eq!(report.object_ids(), vec!["id-a.jpg", "id-b.jpg"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_many_aborts_on_first_failure() {
        let temp_dir = TempDir::new().unwrap();
        let photos = vec![
            temp_dir.path().join("a.jpg"),
            temp_dir.path().join("b.jpg"),
            temp_dir.path().join("c.jpg"),
        ];

        let mut storage = MockStorageRepository::new();
        storage
            .expect_upload_file()
            .withf(|photo, _| photo.name() == "a.jpg")
            .times(1)
            .returning(|_, _| Ok("id-a".to_string()));
        storage
            .expect_upload_file()
            .withf(|photo, _| photo.name() == "b.jpg")
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("500 Internal Server Error")));

        let use_case = use_case(storage, photos);

        let result = use_case.upload_many(temp_dir.path(), "F1").await;
        assert!(result.is_err());
    }
}
