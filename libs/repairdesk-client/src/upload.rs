//! Attachments collected before a ticket is submitted.

use std::path::Path;

use repairdesk_contract::{UploadPolicy, UploadViolation};
use tracing::info;

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::model::UploadedFile;

#[derive(Debug, Clone)]
pub struct PendingFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    uploaded: Option<UploadedFile>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
            uploaded: None,
        }
    }

    /// Reads a file from disk, guessing its content type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Ok(Self::new(name, content_type_for(&ext), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn uploaded(&self) -> Option<&UploadedFile> {
        self.uploaded.as_ref()
    }
}

fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Default)]
pub struct UploadBatch {
    policy: UploadPolicy,
    files: Vec<PendingFile>,
}

impl UploadBatch {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
        }
    }

    /// Adds the whole selection or nothing: count first, then each file's
    /// type and size.
    pub fn add_files(&mut self, selection: Vec<PendingFile>) -> Result<(), ClientError> {
        if selection.is_empty() {
            return Err(UploadViolation::Empty.into());
        }
        self.policy.check_count(self.files.len(), selection.len())?;
        for f in &selection {
            self.policy.check_file(&f.name, &f.content_type, f.size())?;
        }
        self.files.extend(selection);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Uploads every file not uploaded yet. Stops at the first failure;
    /// files already sent keep their result so a retry skips them.
    pub async fn upload_all(&mut self, api: &ApiClient) -> Result<Vec<UploadedFile>, ClientError> {
        if self.files.is_empty() {
            return Err(UploadViolation::Empty.into());
        }
        for f in self.files.iter_mut().filter(|f| f.uploaded.is_none()) {
            let stored = api
                .upload_file(&f.name, &f.content_type, f.bytes.clone())
                .await?;
            info!(file = %f.name, url = %stored.file_url, "file uploaded");
            f.uploaded = Some(stored);
        }
        Ok(self
            .files
            .iter()
            .filter_map(|f| f.uploaded.clone())
            .collect())
    }

    /// URLs to attach to a ticket's `images`.
    pub fn file_urls(&self) -> Vec<String> {
        self.files
            .iter()
            .filter_map(|f| f.uploaded.as_ref().map(|u| u.file_url.clone()))
            .collect()
    }
}
