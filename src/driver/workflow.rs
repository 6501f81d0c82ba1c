//! Workflow Orchestration
//!
//! アップロード・配信の対話ループと依存性の組み立て

use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::adapter::auth::GoogleOAuthFlow;
use crate::adapter::config::Config;
use crate::adapter::drive::client::{DriveClient, DRIVE_SCOPE};
use crate::adapter::repositories::drive_storage_repository::DriveStorageRepository;
use crate::adapter::repositories::json_credential_repository::JsonCredentialRepository;
use crate::adapter::repositories::local_photo_repository::LocalPhotoRepository;
use crate::adapter::repositories::twilio_messaging_repository::TwilioMessagingRepository;
use crate::adapter::twilio::client::TwilioClient;
use crate::adapter::twilio::credentials::MessagingCredentials;
use crate::application::dto::reports::{DistributionReport, UploadOutcome};
use crate::application::dto::requests::{DistributionRequest, UploadRequest};
use crate::application::use_cases::authenticate::AuthenticateUseCase;
use crate::application::use_cases::distribute_batch::DistributeBatchUseCase;
use crate::application::use_cases::upload_batch::UploadBatchUseCase;
use crate::domain::entities::batch::BatchSequencer;
use crate::domain::entities::recipient::PhoneRecipient;
use crate::domain::repositories::messaging_repository::MessagingRepository;
use crate::domain::repositories::photo_repository::PhotoRepository;
use crate::domain::repositories::storage_repository::StorageRepository;

use super::prompt::{self, LinePrompt};

pub const UPLOAD_PROMPT: &str =
    "Please enter the path to the photo or folder you would like to upload: ";
pub const PHONE_PROMPT: &str = "Please enter your phone number: ";
pub const BATCH_PROMPT: &str = "Please enter the batch number you would like to claim: ";

fn print_intro(role: &str) {
    println!("Welcome to the Google Drive {}!", role);
    println!("[*] Authenticating...");
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Uploader Workflow
///
/// 1回の実行中はバッチ番号のカウンタを保持し続ける
pub struct UploaderWorkflow<S: StorageRepository, P: PhotoRepository> {
    use_case: UploadBatchUseCase<S, P>,
    sequencer: BatchSequencer,
}

impl<S: StorageRepository, P: PhotoRepository> UploaderWorkflow<S, P> {
    pub fn new(use_case: UploadBatchUseCase<S, P>, sequencer: BatchSequencer) -> Self {
        Self {
            use_case,
            sequencer,
        }
    }

    /// 次に割り当てられるバッチ番号
    pub fn sequencer(&self) -> &BatchSequencer {
        &self.sequencer
    }

    /// 1回分のプロンプトを処理する（入力終端なら `None`）
    pub async fn step(&mut self, prompt: &mut dyn LinePrompt) -> Result<Option<UploadOutcome>> {
        let Some(line) = prompt.read_line(UPLOAD_PROMPT)? else {
            return Ok(None);
        };
        let request = UploadRequest::new(&line);

        if request.path.exists() {
            println!(
                "[*] Uploading {} as batch {}",
                display_name(&request.path),
                self.sequencer.peek()
            );
        }

        let outcome = self.use_case.execute(&request, &mut self.sequencer).await?;
        match &outcome {
            UploadOutcome::NotFound(path) => {
                println!("[!] File not found: {}", path.display());
                println!("[!] Try again!!");
            }
            UploadOutcome::Uploaded(report) => {
                for photo in &report.photos {
                    println!("[*] File #{} uploaded successfully!", photo.object_id);
                }
            }
        }

        Ok(Some(outcome))
    }

    /// 入力終端まで繰り返す
    ///
    /// # Returns
    ///
    /// 作成したバッチ数
    pub async fn run(&mut self, prompt: &mut dyn LinePrompt) -> Result<usize> {
        let mut batches = 0;
        while let Some(outcome) = self.step(prompt).await? {
            if matches!(outcome, UploadOutcome::Uploaded(_)) {
                batches += 1;
            }
        }
        Ok(batches)
    }
}

/// Sender Workflow
pub struct SenderWorkflow<S: StorageRepository, M: MessagingRepository> {
    use_case: DistributeBatchUseCase<S, M>,
    country_code: String,
}

impl<S: StorageRepository, M: MessagingRepository> SenderWorkflow<S, M> {
    pub fn new(use_case: DistributeBatchUseCase<S, M>, country_code: String) -> Self {
        Self {
            use_case,
            country_code,
        }
    }

    /// 電話番号とバッチ番号を1組読み、配信する（入力終端なら `None`）
    pub async fn step(
        &mut self,
        prompt: &mut dyn LinePrompt,
    ) -> Result<Option<DistributionReport>> {
        let Some(local_number) = prompt.read_line(PHONE_PROMPT)? else {
            return Ok(None);
        };
        let recipient = PhoneRecipient::with_country_code(&self.country_code, &local_number);

        let Some(batch) = prompt.read_line(BATCH_PROMPT)? else {
            return Ok(None);
        };
        let request = DistributionRequest::new(&batch, recipient);

        println!("[*] Sending photos to your number {}", request.recipient);
        let report = self.use_case.execute(&request).await?;

        match &report.last_message_id {
            Some(sid) => println!(
                "[*] Message with #{} is successfully sent to {}",
                sid, request.recipient
            ),
            None => println!("[!] Batch {} has no photos", request.batch),
        }

        Ok(Some(report))
    }

    /// 入力終端まで繰り返す
    ///
    /// # Returns
    ///
    /// 処理した配信数
    pub async fn run(&mut self, prompt: &mut dyn LinePrompt) -> Result<usize> {
        let mut deliveries = 0;
        while self.step(prompt).await?.is_some() {
            deliveries += 1;
        }
        Ok(deliveries)
    }
}

/// 保存済みトークンを読み込み（必要なら更新・同意）、Driveセッションを開く
#[cfg_attr(coverage_nightly, coverage(off))]
async fn open_drive_session(config: &Config) -> Result<DriveClient> {
    let credential_repo = Arc::new(JsonCredentialRepository::new(config.token_path()));
    let flow = Arc::new(GoogleOAuthFlow::connect(
        config.client_secrets_path(),
        DRIVE_SCOPE,
    )?);

    let credential = AuthenticateUseCase::new(
        credential_repo.clone(),
        flow.clone(),
        DRIVE_SCOPE.to_string(),
    )
    .load_or_refresh_credentials()
    .await?;

    DriveClient::open_session(&config.drive_api_base, credential, flow, credential_repo)
}

/// アップローダーを起動する
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn run_upload(config: Config) -> Result<()> {
    print_intro("Uploader");
    tokio::time::sleep(config.startup_delay()).await;

    let drive = Arc::new(open_drive_session(&config).await?);
    let storage_repo = Arc::new(DriveStorageRepository::new(drive));
    let photo_repo = Arc::new(LocalPhotoRepository::new());
    let use_case = UploadBatchUseCase::new(storage_repo, photo_repo, config.root_folder_id.clone());

    let mut workflow = UploaderWorkflow::new(
        use_case,
        BatchSequencer::starting_at(config.first_batch_number),
    );
    let mut prompt = prompt::interactive();
    let batches = workflow.run(prompt.as_mut()).await?;

    info!(
        "Uploader finished: {} batches, next batch {}",
        batches,
        workflow.sequencer().peek()
    );
    Ok(())
}

/// 送信機を起動する
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn run_send(config: Config) -> Result<()> {
    print_intro("Sender");
    let messaging_credentials = MessagingCredentials::load(&config.messaging_credentials_path())?;
    let twilio = Arc::new(TwilioClient::connect(
        &config.messaging_api_base,
        messaging_credentials,
    )?);
    tokio::time::sleep(config.startup_delay()).await;

    let drive = Arc::new(open_drive_session(&config).await?);
    let storage_repo = Arc::new(DriveStorageRepository::new(drive));
    let messaging_repo = Arc::new(TwilioMessagingRepository::new(twilio));
    let use_case = DistributeBatchUseCase::new(storage_repo, messaging_repo, config.delivery_config());

    let mut workflow = SenderWorkflow::new(use_case, config.country_code.clone());
    let mut prompt = prompt::interactive();
    let deliveries = workflow.run(prompt.as_mut()).await?;

    info!("Sender finished: {} deliveries", deliveries);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::fs;
    use tempfile::TempDir;

    use crate::application::dto::reports::DeliveryConfig;
    use crate::domain::entities::photo::{FilePage, RemoteObject};
    use crate::domain::errors::BatchLookupError;
    use crate::domain::repositories::messaging_repository::MockMessagingRepository;
    use crate::domain::repositories::storage_repository::{FileQuery, MockStorageRepository};
    use crate::driver::prompt::ScriptedPrompt;

    fn delivery_config() -> DeliveryConfig {
        DeliveryConfig {
            sender_address: "whatsapp:+14155238886".to_string(),
            channel_prefix: "whatsapp:".to_string(),
            message_body: "Thank you for coming!".to_string(),
            storage_host: "drive.google.com".to_string(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/photos/a.jpg")), "a.jpg");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[tokio::test]
    async fn test_uploader_retries_missing_path_without_consuming_batch() {
        let temp_dir = TempDir::new().unwrap();
        let photo = temp_dir.path().join("a.jpg");
        fs::write(&photo, b"jpeg").unwrap();

        let mut storage = MockStorageRepository::new();
        storage
            .expect_create_folder()
            .with(eq("1"), eq("root"))
            .times(1)
            .returning(|_, _| Ok("F1".to_string()));
        storage
            .expect_upload_file()
            .times(1)
            .returning(|_, _| Ok("id1".to_string()));

        let use_case = UploadBatchUseCase::new(
            Arc::new(storage),
            Arc::new(LocalPhotoRepository::new()),
            "root".to_string(),
        );
        let mut workflow = UploaderWorkflow::new(use_case, BatchSequencer::new());
        let mut prompt = ScriptedPrompt::new([
            temp_dir.path().join("missing.jpg").to_string_lossy().into_owned(),
            photo.to_string_lossy().into_owned(),
        ]);

        let batches = workflow.run(&mut prompt).await.unwrap();

        assert_eq!(batches, 1);
        assert_eq!(workflow.sequencer().peek().value(), 2);
        assert_eq!(prompt.asked().len(), 3);
    }

    #[tokio::test]
    async fn test_uploader_stops_on_storage_error() {
        let temp_dir = TempDir::new().unwrap();

        let mut storage = MockStorageRepository::new();
        storage
            .expect_create_folder()
            .returning(|_, _| Err(anyhow::anyhow!("quota exceeded")));

        let use_case = UploadBatchUseCase::new(
            Arc::new(storage),
            Arc::new(LocalPhotoRepository::new()),
            "root".to_string(),
        );
        let mut workflow = UploaderWorkflow::new(use_case, BatchSequencer::new());
        let mut prompt = ScriptedPrompt::new([temp_dir.path().to_string_lossy().into_owned()]);

        assert!(workflow.run(&mut prompt).await.is_err());
        assert_eq!(workflow.sequencer().peek().value(), 1);
    }

    #[tokio::test]
    async fn test_sender_prefixes_country_code() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_list_files()
            .withf(|query, _| matches!(query, FileQuery::FoldersNamed(name) if name == "3"))
            .returning(|_, _| {
                Ok(FilePage {
                    files: vec![RemoteObject::new("F3", Some("3".to_string()))],
                    next_page_token: None,
                })
            });
        storage
            .expect_grant_public_read()
            .with(eq("F3"))
            .returning(|_| Ok(()));
        storage
            .expect_list_files()
            .withf(|query, _| matches!(query, FileQuery::ChildrenOf(id) if id == "F3"))
            .returning(|_, _| {
                Ok(FilePage {
                    files: vec![RemoteObject::new("id1", None)],
                    next_page_token: None,
                })
            });

        let mut messaging = MockMessagingRepository::new();
        messaging
            .expect_send_message()
            .withf(|message| message.to == "whatsapp:+6591234567")
            .times(1)
            .returning(|_| Ok("SM1".to_string()));

        let use_case =
            DistributeBatchUseCase::new(Arc::new(storage), Arc::new(messaging), delivery_config());
        let mut workflow = SenderWorkflow::new(use_case, "+65".to_string());
        let mut prompt = ScriptedPrompt::new(["91234567", "3"]);

        let report = workflow.step(&mut prompt).await.unwrap().unwrap();

        assert_eq!(report.last_message_id.as_deref(), Some("SM1"));
        assert_eq!(prompt.asked(), [PHONE_PROMPT, BATCH_PROMPT]);
        assert!(workflow.step(&mut prompt).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sender_unknown_batch_is_fatal() {
        let mut storage = MockStorageRepository::new();
        storage
            .expect_list_files()
            .returning(|_, _| Ok(FilePage::default()));

        let use_case = DistributeBatchUseCase::new(
            Arc::new(storage),
            Arc::new(MockMessagingRepository::new()),
            delivery_config(),
        );
        let mut workflow = SenderWorkflow::new(use_case, "+65".to_string());
        let mut prompt = ScriptedPrompt::new(["91234567", "42", "91234567", "1"]);

        let err = workflow.run(&mut prompt).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<BatchLookupError>(),
            Some(&BatchLookupError::NotFound("42".to_string()))
        );
    }

    #[tokio::test]
    async fn test_sender_stops_when_batch_prompt_hits_eof() {
        let use_case = DistributeBatchUseCase::new(
            Arc::new(MockStorageRepository::new()),
            Arc::new(MockMessagingRepository::new()),
            delivery_config(),
        );
        let mut workflow = SenderWorkflow::new(use_case, "+65".to_string());
        let mut prompt = ScriptedPrompt::new(["91234567"]);

        assert_eq!(workflow.run(&mut prompt).await.unwrap(), 0);
    }
}
