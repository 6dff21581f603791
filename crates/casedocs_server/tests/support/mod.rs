//! Shared integration-test server bootstrap helpers.

#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use casedocs_server::models::document::{Classification, DocumentMetadata, UploadedFile};
use casedocs_server::models::folder::Folder;
use casedocs_server::{create_app, AppError, AppState, Config, Database, FolderService};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

pub(crate) const USER_ID: &str = "userId";
pub(crate) const DIVORCE_TOKEN: &str = "divorce-token";
pub(crate) const PROBATE_TOKEN: &str = "probate-token";

/// One recorded `attach_documents` invocation.
#[derive(Debug, Clone)]
pub(crate) struct AttachCall {
    pub folder_id: Uuid,
    pub files: Vec<UploadedFile>,
    pub classification: Classification,
    pub metadata: DocumentMetadata,
}

/// In-memory folder service that records every call.
#[derive(Default)]
pub(crate) struct RecordingFolderService {
    folders: Mutex<HashMap<Uuid, Folder>>,
    find_calls: Mutex<Vec<Uuid>>,
    create_calls: Mutex<Vec<Folder>>,
    attach_calls: Mutex<Vec<AttachCall>>,
    failing: AtomicBool,
}

impl RecordingFolderService {
    pub(crate) fn insert(&self, folder: Folder) {
        self.folders
            .lock()
            .expect("folders lock")
            .insert(folder.id, folder);
    }

    /// Make every subsequent call fail with a storage error.
    pub(crate) fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn find_calls(&self) -> Vec<Uuid> {
        self.find_calls.lock().expect("find lock").clone()
    }

    pub(crate) fn create_calls(&self) -> Vec<Folder> {
        self.create_calls.lock().expect("create lock").clone()
    }

    pub(crate) fn attach_calls(&self) -> Vec<AttachCall> {
        self.attach_calls.lock().expect("attach lock").clone()
    }

    fn check_failing(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::StorageMessage("simulated storage failure".into()));
        }
        Ok(())
    }
}

impl FolderService for RecordingFolderService {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Folder>, AppError> {
        self.find_calls.lock().expect("find lock").push(id);
        self.check_failing()?;
        Ok(self.folders.lock().expect("folders lock").get(&id).cloned())
    }

    fn create(&self, folder: Folder) -> Result<Folder, AppError> {
        self.create_calls
            .lock()
            .expect("create lock")
            .push(folder.clone());
        self.check_failing()?;
        self.insert(folder.clone());
        Ok(folder)
    }

    fn attach_documents(
        &self,
        folder_id: Uuid,
        files: Vec<UploadedFile>,
        classification: Classification,
        metadata: DocumentMetadata,
    ) -> Result<(), AppError> {
        self.attach_calls
            .lock()
            .expect("attach lock")
            .push(AttachCall {
                folder_id,
                files,
                classification,
                metadata,
            });
        self.check_failing()
    }
}

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_upload_size: 10_000_000,
        authorized_services: vec!["divorce".to_string()],
        service_tokens: HashMap::from([
            (DIVORCE_TOKEN.to_string(), "divorce".to_string()),
            (PROBATE_TOKEN.to_string(), "probate".to_string()),
        ]),
    }
}

/// Server over a recording mock service.
pub(crate) fn setup_mock_server() -> (TestServer, Arc<RecordingFolderService>) {
    let service = Arc::new(RecordingFolderService::default());
    let config = test_config_for_db_path(Path::new("/unused"));
    let state = AppState::with_service(config, service.clone());
    let server = TestServer::new(create_app(state, false)).expect("server");
    (server, service)
}

/// Server over the redb-backed service in a temp dir.
pub(crate) fn setup_db_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let config = test_config_for_db_path(&db_path);
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db);
    let server = TestServer::new(create_app(state, false)).expect("server");
    (server, temp_dir)
}

pub(crate) fn with_user(request: TestRequest, user: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("user-id"),
        HeaderValue::from_str(user).expect("user header"),
    )
}

pub(crate) fn with_service_token(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("serviceauthorization"),
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("service header"),
    )
}

/// Attach an authorized user and the authorized `divorce` service.
pub(crate) fn authorized(request: TestRequest) -> TestRequest {
    with_service_token(with_user(request, USER_ID), DIVORCE_TOKEN)
}
