//! Signed-URL upload orchestration
//!
//! Each file goes through three steps: obtain a single-use write credential,
//! PUT the raw bytes straight to the signed storage URL, then register the
//! object's metadata with the backend. Files are processed one at a time and
//! a failure only affects the file it happened on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Body;
use shared::{CommonError, Result};
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::http::ApiTransport;
use crate::models::{RegisterFileRequest, RegisteredFile, SignedUrlRequest, SignedUrlResponse, SignedWriteCredential};

/// Progress after the write credential was issued
pub const PROGRESS_CREDENTIAL: u8 = 10;
/// Progress after the bytes reached storage
pub const PROGRESS_TRANSFERRED: u8 = 90;
pub const PROGRESS_COMPLETE: u8 = 100;

#[derive(Debug, Clone)]
enum FileSource {
    Disk(PathBuf),
    Memory(Bytes),
}

/// A local file selected for upload
#[derive(Debug, Clone)]
pub struct LocalFile {
    name: String,
    content_type: String,
    size: u64,
    source: FileSource,
}

impl LocalFile {
    /// Stat a file on disk; the content type is guessed from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| CommonError::Io(format!("{}: {}", path.display(), e)))?;

        if !metadata.is_file() {
            return Err(CommonError::ValidationFailed(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CommonError::ValidationFailed(format!("{} has no file name", path.display())))?;

        Ok(Self {
            content_type: guess_content_type(&name),
            name,
            size: metadata.len(),
            source: FileSource::Disk(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        let name = name.into();
        let contents = contents.into();
        Self {
            content_type: guess_content_type(&name),
            size: contents.len() as u64,
            name,
            source: FileSource::Memory(contents),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size when the file was selected, refreshed once an upload starts
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Part of the MIME type after the slash (`image/png` → `png`)
    pub fn mime_subtype(&self) -> &str {
        match self.content_type.split_once('/') {
            Some((_, subtype)) => subtype,
            None => &self.content_type,
        }
    }

    /// Open the contents for one transfer. Files on disk are stat'ed again
    /// through the open handle, so the payload length is what gets sent.
    pub async fn open(&self) -> Result<TransferPayload> {
        let (len, source) = match &self.source {
            FileSource::Memory(contents) => (
                contents.len() as u64,
                PayloadSource::Memory(contents.clone()),
            ),
            FileSource::Disk(path) => {
                let io_error = |e: std::io::Error| CommonError::Io(format!("{}: {}", path.display(), e));
                let file = tokio::fs::File::open(path).await.map_err(io_error)?;
                let len = file.metadata().await.map_err(io_error)?.len();
                (len, PayloadSource::Disk(file))
            }
        };

        Ok(TransferPayload {
            content_type: self.content_type.clone(),
            len,
            source,
        })
    }
}

#[derive(Debug)]
enum PayloadSource {
    Memory(Bytes),
    Disk(tokio::fs::File),
}

/// Contents of one storage PUT
#[derive(Debug)]
pub struct TransferPayload {
    content_type: String,
    len: u64,
    source: PayloadSource,
}

impl TransferPayload {
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// In-memory contents; `None` when the payload streams from disk
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.source {
            PayloadSource::Memory(contents) => Some(contents),
            PayloadSource::Disk(_) => None,
        }
    }

    /// Request body; disk files are streamed and capped at `len` bytes
    pub fn into_body(self) -> Body {
        match self.source {
            PayloadSource::Memory(contents) => Body::from(contents),
            PayloadSource::Disk(file) => Body::wrap_stream(ReaderStream::new(file.take(self.len))),
        }
    }
}

fn guess_content_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[derive(Debug)]
pub enum UploadStatus {
    Pending,
    InProgress,
    Completed,
    /// Holds one of the per-file upload errors
    Failed(CommonError),
}

/// Upload state of a single selected file
#[derive(Debug)]
pub struct UploadTask {
    pub file: LocalFile,
    pub progress: u8,
    pub remote_id: Option<i64>,
    pub status: UploadStatus,
}

impl UploadTask {
    pub fn new(file: LocalFile) -> Self {
        Self {
            file,
            progress: 0,
            remote_id: None,
            status: UploadStatus::Pending,
        }
    }

    /// Completed tasks are never touched again
    pub fn is_complete(&self) -> bool {
        self.progress >= PROGRESS_COMPLETE
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, UploadStatus::Failed(_))
    }

    pub fn error(&self) -> Option<&CommonError> {
        match &self.status {
            UploadStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.progress = 0;
        self.remote_id = None;
        self.status = UploadStatus::InProgress;
    }
}

/// Metadata applied to every file of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl UploadOptions {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = Some(category.trim().to_string()).filter(|c| !c.is_empty());
        self
    }

    /// Blank and duplicate tags are ignored
    pub fn add_tag(&mut self, tag: impl AsRef<str>) {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }

    /// Registered `type`: the category when given, else the MIME subtype
    pub fn file_type_for(&self, file: &LocalFile) -> String {
        match &self.category {
            Some(category) => category.clone(),
            None => file.mime_subtype().to_string(),
        }
    }
}

/// Receives a task after every state change of an upload
pub trait ProgressReporter: Send + Sync {
    fn report(&self, index: usize, task: &UploadTask);
}

/// Reporter that drops every update
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _index: usize, _task: &UploadTask) {}
}

/// The three backend interactions behind one upload
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn request_credential(&self, request: &SignedUrlRequest) -> Result<SignedWriteCredential>;

    async fn transfer(&self, credential: &SignedWriteCredential, payload: TransferPayload) -> Result<()>;

    async fn register(&self, request: &RegisterFileRequest) -> Result<RegisteredFile>;
}

/// [`UploadBackend`] talking to the REST API and the signed storage URL
#[derive(Clone)]
pub struct HttpUploadBackend {
    transport: ApiTransport,
}

impl HttpUploadBackend {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl UploadBackend for HttpUploadBackend {
    async fn request_credential(&self, request: &SignedUrlRequest) -> Result<SignedWriteCredential> {
        let response: SignedUrlResponse = self.transport.post_raw("files/signed-url", request).await?;
        response.into_credential()
    }

    async fn transfer(&self, credential: &SignedWriteCredential, payload: TransferPayload) -> Result<()> {
        let content_type = payload.content_type().to_string();
        let len = payload.len();
        self.transport
            .put_body(&credential.upload_url, &content_type, len, payload.into_body())
            .await
    }

    async fn register(&self, request: &RegisterFileRequest) -> Result<RegisteredFile> {
        self.transport
            .post("files", request)
            .await?
            .ensure_success("Failed to register file")?
            .into_data()
    }
}

/// A file that made it through all three steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub index: usize,
    pub id: i64,
    pub name: String,
    pub size: u64,
    pub file_type: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Outcome of one orchestrator run
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<UploadedFile>,
    /// Indices of tasks that failed during this run
    pub failed: Vec<usize>,
    /// Indices of tasks that were already complete
    pub skipped: Vec<usize>,
}

impl UploadReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }
}

/// Runs upload tasks one after another against an [`UploadBackend`]
pub struct UploadOrchestrator<B> {
    backend: B,
}

impl<B: UploadBackend> UploadOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Upload every incomplete task in order.
    ///
    /// A failing file is marked failed and reported, and the batch moves on
    /// to the next one. The batch is not cancellable.
    pub async fn run(
        &self,
        tasks: &mut [UploadTask],
        options: &UploadOptions,
        reporter: &dyn ProgressReporter,
    ) -> UploadReport {
        let mut report = UploadReport::default();

        for (index, task) in tasks.iter_mut().enumerate() {
            if task.is_complete() {
                report.skipped.push(index);
                continue;
            }

            task.reset();
            reporter.report(index, task);

            match self.upload_one(index, task, options, reporter).await {
                Ok((registered, size)) => {
                    let file_type = registered
                        .file_type
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| options.file_type_for(&task.file));

                    task.file.size = size;
                    task.remote_id = Some(registered.id);
                    task.progress = PROGRESS_COMPLETE;
                    task.status = UploadStatus::Completed;
                    info!("{} uploaded as file {}", task.file.name(), registered.id);

                    report.uploaded.push(UploadedFile {
                        index,
                        id: registered.id,
                        name: task.file.name().to_string(),
                        size,
                        file_type,
                        category: options.category.clone(),
                        tags: options.tags.clone(),
                        uploaded_at: Utc::now(),
                    });
                }
                Err(e) => {
                    warn!("Upload of {} failed: {}", task.file.name(), e);
                    task.remote_id = None;
                    task.status = UploadStatus::Failed(e);
                    report.failed.push(index);
                }
            }

            reporter.report(index, task);
        }

        debug!(
            "Upload batch finished: {} uploaded, {} failed, {} skipped",
            report.uploaded.len(),
            report.failed.len(),
            report.skipped.len()
        );
        report
    }

    async fn upload_one(
        &self,
        index: usize,
        task: &mut UploadTask,
        options: &UploadOptions,
        reporter: &dyn ProgressReporter,
    ) -> Result<(RegisteredFile, u64)> {
        let file = &task.file;

        let credential = self
            .backend
            .request_credential(&SignedUrlRequest {
                name: file.name().to_string(),
                content_type: file.content_type().to_string(),
            })
            .await
            .map_err(|e| match e {
                CommonError::Credential(_) => e,
                other => CommonError::Credential(other.to_string()),
            })?;
        debug!("Credential issued for {} at {}", file.name(), credential.file_path);

        let payload = file
            .open()
            .await
            .map_err(|e| CommonError::Transfer(e.to_string()))?;
        let size = payload.len();

        let register = RegisterFileRequest {
            name: file.name().to_string(),
            path: credential.file_path.clone(),
            mime_type: file.content_type().to_string(),
            size,
            file_type: options.file_type_for(file),
        };

        task.progress = PROGRESS_CREDENTIAL;
        reporter.report(index, task);

        self.backend
            .transfer(&credential, payload)
            .await
            .map_err(|e| CommonError::Transfer(e.to_string()))?;

        task.progress = PROGRESS_TRANSFERRED;
        reporter.report(index, task);

        let registered = self
            .backend
            .register(&register)
            .await
            .map_err(|e| CommonError::Registration(e.to_string()))?;
        Ok((registered, size))
    }
}

/// Files selected for upload, kept until the caller removes them
#[derive(Debug, Default)]
pub struct UploadQueue {
    tasks: Vec<UploadTask>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: LocalFile) {
        self.tasks.push(UploadTask::new(file));
    }

    /// Remove every task for the given file name, returning how many were dropped
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.file.name() != name);
        before - self.tasks.len()
    }

    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks.iter().filter(|task| !task.is_complete())
    }

    pub fn completed(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks.iter().filter(|task| task.is_complete())
    }

    pub fn failed(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks.iter().filter(|task| task.is_failed())
    }

    /// Upload every incomplete task; an empty queue is rejected
    pub async fn upload<B: UploadBackend>(
        &mut self,
        orchestrator: &UploadOrchestrator<B>,
        options: &UploadOptions,
        reporter: &dyn ProgressReporter,
    ) -> Result<UploadReport> {
        if self.tasks.is_empty() {
            return Err(CommonError::ValidationFailed(
                "Please select at least one file".to_string(),
            ));
        }
        Ok(orchestrator.run(&mut self.tasks, options, reporter).await)
    }

    /// Run only the tasks that failed previously
    pub async fn retry_failed<B: UploadBackend>(
        &mut self,
        orchestrator: &UploadOrchestrator<B>,
        options: &UploadOptions,
        reporter: &dyn ProgressReporter,
    ) -> UploadReport {
        let mut report = UploadReport::default();

        for (index, task) in self.tasks.iter_mut().enumerate() {
            if !task.is_failed() {
                continue;
            }
            let mut single = orchestrator
                .run(std::slice::from_mut(task), options, reporter)
                .await;
            for uploaded in &mut single.uploaded {
                uploaded.index = index;
            }
            report.uploaded.append(&mut single.uploaded);
            report.failed.extend(single.failed.iter().map(|_| index));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn credential_for(name: &str) -> SignedWriteCredential {
        SignedWriteCredential {
            upload_url: format!("https://bucket.example.com/{}?sig=x", name),
            file_path: format!("uploads/{}", name),
        }
    }

    fn tasks(names: &[&str]) -> Vec<UploadTask> {
        names
            .iter()
            .map(|name| UploadTask::new(LocalFile::from_bytes(*name, format!("contents of {}", name))))
            .collect()
    }

    /// Records (index, progress) pairs
    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<(usize, u8, bool)>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, index: usize, task: &UploadTask) {
            self.events
                .lock()
                .unwrap()
                .push((index, task.progress, task.is_failed()));
        }
    }

    #[test]
    fn test_local_file_from_bytes() {
        let file = LocalFile::from_bytes("diagram.png", vec![0u8; 42]);
        assert_eq!(file.content_type(), "image/png");
        assert_eq!(file.mime_subtype(), "png");
        assert_eq!(file.size(), 42);

        let file = LocalFile::from_bytes("notes", "abc").with_content_type("custom");
        assert_eq!(file.mime_subtype(), "custom");
    }

    #[tokio::test]
    async fn test_local_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = LocalFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "report.pdf");
        assert_eq!(file.content_type(), "application/pdf");
        assert_eq!(file.size(), 8);

        let payload = file.open().await.unwrap();
        assert_eq!(payload.len(), 8);
        assert_eq!(payload.content_type(), "application/pdf");
        assert!(payload.bytes().is_none());

        assert!(LocalFile::from_path(dir.path()).await.is_err());
        assert!(LocalFile::from_path(dir.path().join("missing.txt")).await.is_err());
    }

    #[test]
    fn test_file_type_prefers_category() {
        let file = LocalFile::from_bytes("clip.mp4", "x");
        assert_eq!(UploadOptions::default().file_type_for(&file), "mp4");
        assert_eq!(
            UploadOptions::default()
                .with_category("footage")
                .file_type_for(&file),
            "footage"
        );
        assert_eq!(UploadOptions::default().with_category("  ").category, None);
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let options = UploadOptions::default().with_tags(["q3", " q3 ", "", "legal"]);
        assert_eq!(options.tags, vec!["q3".to_string(), "legal".to_string()]);
    }

    #[tokio::test]
    async fn test_second_credential_failure_only_fails_that_file() {
        let mut backend = MockUploadBackend::new();
        backend.expect_request_credential().times(3).returning(|request| {
            if request.name == "b.txt" {
                Err(CommonError::Api {
                    status: 500,
                    message: "signer unavailable".to_string(),
                })
            } else {
                Ok(credential_for(&request.name))
            }
        });
        backend
            .expect_transfer()
            .times(2)
            .returning(|_, _| Ok(()));
        let next_id = Mutex::new(100);
        backend.expect_register().times(2).returning(move |_| {
            let mut id = next_id.lock().unwrap();
            *id += 1;
            Ok(RegisteredFile {
                id: *id,
                file_type: None,
            })
        });

        let orchestrator = UploadOrchestrator::new(backend);
        let mut batch = tasks(&["a.txt", "b.txt", "c.txt"]);
        let report = orchestrator
            .run(&mut batch, &UploadOptions::default(), &SilentReporter)
            .await;

        assert_eq!(report.failed, vec![1]);
        assert_eq!(report.uploaded.len(), 2);
        assert!(batch[0].is_complete());
        assert!(batch[2].is_complete());
        assert_eq!(batch[0].remote_id, Some(101));
        assert_eq!(batch[2].remote_id, Some(102));

        assert!(!batch[1].is_complete());
        assert_eq!(batch[1].remote_id, None);
        assert!(matches!(batch[1].error(), Some(CommonError::Credential(_))));
    }

    #[tokio::test]
    async fn test_transfer_failure_skips_registration() {
        let mut backend = MockUploadBackend::new();
        backend
            .expect_request_credential()
            .returning(|request| Ok(credential_for(&request.name)));
        backend
            .expect_transfer()
            .times(1)
            .returning(|_, _| Err(CommonError::Api { status: 403, message: "expired".to_string() }));
        backend.expect_register().never();

        let orchestrator = UploadOrchestrator::new(backend);
        let mut batch = tasks(&["a.txt"]);
        let report = orchestrator
            .run(&mut batch, &UploadOptions::default(), &SilentReporter)
            .await;

        assert!(!report.all_succeeded());
        assert!(matches!(batch[0].error(), Some(CommonError::Transfer(_))));
        assert_eq!(batch[0].progress, PROGRESS_CREDENTIAL);
    }

    #[tokio::test]
    async fn test_registration_failure_leaves_task_without_id() {
        let mut backend = MockUploadBackend::new();
        backend
            .expect_request_credential()
            .returning(|request| Ok(credential_for(&request.name)));
        backend.expect_transfer().returning(|_, _| Ok(()));
        backend
            .expect_register()
            .returning(|_| Err(CommonError::Rejected("duplicate path".to_string())));

        let orchestrator = UploadOrchestrator::new(backend);
        let mut batch = tasks(&["a.txt"]);
        orchestrator
            .run(&mut batch, &UploadOptions::default(), &SilentReporter)
            .await;

        assert!(matches!(batch[0].error(), Some(CommonError::Registration(_))));
        assert_eq!(batch[0].remote_id, None);
        assert!(batch[0].progress < PROGRESS_COMPLETE);
    }

    #[tokio::test]
    async fn test_registration_payload_and_progress_events() {
        let mut backend = MockUploadBackend::new();
        backend
            .expect_request_credential()
            .withf(|request| request.name == "photo.jpg" && request.content_type == "image/jpeg")
            .returning(|request| Ok(credential_for(&request.name)));
        backend
            .expect_transfer()
            .withf(|credential, payload| {
                credential.upload_url.starts_with("https://bucket.example.com/photo.jpg")
                    && payload.content_type() == "image/jpeg"
                    && payload.bytes().is_some_and(|b| &b[..] == b"jpeg bytes")
            })
            .returning(|_, _| Ok(()));
        backend
            .expect_register()
            .withf(|request| {
                request.path == "uploads/photo.jpg"
                    && request.mime_type == "image/jpeg"
                    && request.size == 10
                    && request.file_type == "holiday"
            })
            .returning(|_| {
                Ok(RegisteredFile {
                    id: 7,
                    file_type: Some("jpeg".to_string()),
                })
            });

        let orchestrator = UploadOrchestrator::new(backend);
        let mut batch = vec![UploadTask::new(LocalFile::from_bytes("photo.jpg", "jpeg bytes"))];
        let options = UploadOptions::default()
            .with_category("holiday")
            .with_tags(["beach"]);
        let reporter = RecordingReporter::default();

        let report = orchestrator.run(&mut batch, &options, &reporter).await;

        assert_eq!(batch[0].progress, 100);
        assert_eq!(batch[0].remote_id, Some(7));
        assert_eq!(report.uploaded[0].file_type, "jpeg");
        assert_eq!(report.uploaded[0].tags, vec!["beach".to_string()]);
        assert_eq!(
            *reporter.events.lock().unwrap(),
            vec![(0, 0, false), (0, 10, false), (0, 90, false), (0, 100, false)]
        );
    }

    #[tokio::test]
    async fn test_size_is_taken_when_the_upload_starts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, b"short").unwrap();
        let file = LocalFile::from_path(&path).await.unwrap();
        assert_eq!(file.size(), 5);

        std::fs::write(&path, b"much longer contents").unwrap();

        let mut backend = MockUploadBackend::new();
        backend
            .expect_request_credential()
            .returning(|request| Ok(credential_for(&request.name)));
        backend
            .expect_transfer()
            .withf(|_, payload| payload.len() == 20 && payload.bytes().is_none())
            .times(1)
            .returning(|_, _| Ok(()));
        backend
            .expect_register()
            .withf(|request| request.size == 20)
            .times(1)
            .returning(|_| Ok(RegisteredFile { id: 1, file_type: None }));

        let orchestrator = UploadOrchestrator::new(backend);
        let mut batch = vec![UploadTask::new(file)];
        let report = orchestrator
            .run(&mut batch, &UploadOptions::default(), &SilentReporter)
            .await;

        assert_eq!(report.uploaded[0].size, 20);
        assert_eq!(batch[0].file.size(), 20);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_transfer_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        std::fs::write(&path, b"x").unwrap();
        let file = LocalFile::from_path(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let mut backend = MockUploadBackend::new();
        backend
            .expect_request_credential()
            .returning(|request| Ok(credential_for(&request.name)));
        backend.expect_transfer().never();
        backend.expect_register().never();

        let orchestrator = UploadOrchestrator::new(backend);
        let mut batch = vec![UploadTask::new(file)];
        orchestrator
            .run(&mut batch, &UploadOptions::default(), &SilentReporter)
            .await;

        assert!(matches!(batch[0].error(), Some(CommonError::Transfer(_))));
    }

    #[tokio::test]
    async fn test_completed_tasks_are_not_uploaded_again() {
        let mut backend = MockUploadBackend::new();
        backend.expect_request_credential().never();

        let orchestrator = UploadOrchestrator::new(backend);
        let mut batch = tasks(&["a.txt"]);
        batch[0].progress = PROGRESS_COMPLETE;
        batch[0].remote_id = Some(5);
        batch[0].status = UploadStatus::Completed;

        let report = orchestrator
            .run(&mut batch, &UploadOptions::default(), &SilentReporter)
            .await;

        assert_eq!(report.skipped, vec![0]);
        assert_eq!(batch[0].remote_id, Some(5));
    }

    #[tokio::test]
    async fn test_queue_retry_only_runs_failed_tasks() {
        let mut backend = MockUploadBackend::new();
        let attempts = Mutex::new(0);
        backend.expect_request_credential().returning(move |request| {
            let mut attempts = attempts.lock().unwrap();
            *attempts += 1;
            // First attempt at b.txt fails
            if request.name == "b.txt" && *attempts == 2 {
                Err(CommonError::Network("timed out".to_string()))
            } else {
                Ok(credential_for(&request.name))
            }
        });
        backend.expect_transfer().returning(|_, _| Ok(()));
        backend.expect_register().times(2).returning(|request| {
            Ok(RegisteredFile {
                id: if request.name == "a.txt" { 1 } else { 2 },
                file_type: None,
            })
        });

        let orchestrator = UploadOrchestrator::new(backend);
        let mut queue = UploadQueue::new();
        queue.add(LocalFile::from_bytes("a.txt", "a"));
        queue.add(LocalFile::from_bytes("b.txt", "b"));

        let report = queue
            .upload(&orchestrator, &UploadOptions::default(), &SilentReporter)
            .await
            .unwrap();
        assert_eq!(report.failed, vec![1]);
        assert_eq!(queue.failed().count(), 1);

        let retry = queue
            .retry_failed(&orchestrator, &UploadOptions::default(), &SilentReporter)
            .await;
        assert_eq!(retry.uploaded.len(), 1);
        assert_eq!(retry.uploaded[0].index, 1);
        assert_eq!(queue.completed().count(), 2);
        assert_eq!(queue.pending().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_queue_is_rejected() {
        let orchestrator = UploadOrchestrator::new(MockUploadBackend::new());
        let mut queue = UploadQueue::new();

        let err = queue
            .upload(&orchestrator, &UploadOptions::default(), &SilentReporter)
            .await
            .unwrap_err();
        assert!(matches!(err, CommonError::ValidationFailed(_)));
    }

    #[test]
    fn test_queue_remove() {
        let mut queue = UploadQueue::new();
        queue.add(LocalFile::from_bytes("a.txt", "a"));
        queue.add(LocalFile::from_bytes("b.txt", "b"));

        assert_eq!(queue.remove("a.txt"), 1);
        assert_eq!(queue.remove("a.txt"), 0);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.tasks()[0].file.name(), "b.txt");
    }
}
