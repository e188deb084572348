use thiserror::Error;

pub const DEFAULT_MAX_FILES: usize = 5;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
    "text/plain",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadViolation {
    #[error("at most {max} files can be uploaded (got {requested})")]
    TooManyFiles { max: usize, requested: usize },

    #[error("only images, PDF and plain text files are allowed ('{name}' is {content_type})")]
    DisallowedType { name: String, content_type: String },

    #[error("files must be smaller than {max_mb} MB ('{name}' is {size} bytes)")]
    TooLarge { name: String, size: u64, max_mb: u64 },

    #[error("no files selected")]
    Empty,
}

/// Limits applied to a batch of files before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_files: usize,
    pub max_file_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn is_allowed_type(content_type: &str) -> bool {
        ALLOWED_CONTENT_TYPES.contains(&essence(content_type).as_str())
    }

    pub fn check_count(&self, already: usize, adding: usize) -> Result<(), UploadViolation> {
        let requested = already + adding;
        if requested > self.max_files {
            return Err(UploadViolation::TooManyFiles {
                max: self.max_files,
                requested,
            });
        }
        Ok(())
    }

    pub fn check_file(
        &self,
        name: &str,
        content_type: &str,
        size: u64,
    ) -> Result<(), UploadViolation> {
        if !Self::is_allowed_type(content_type) {
            return Err(UploadViolation::DisallowedType {
                name: name.to_string(),
                content_type: content_type.to_string(),
            });
        }
        if size > self.max_file_bytes {
            return Err(UploadViolation::TooLarge {
                name: name.to_string(),
                size,
                max_mb: self.max_file_bytes / (1024 * 1024),
            });
        }
        Ok(())
    }

    /// File extension used when persisting an accepted upload.
    pub fn extension_for(content_type: &str) -> &'static str {
        match essence(content_type).as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "application/pdf" => "pdf",
            "text/plain" => "txt",
            _ => "bin",
        }
    }
}

/// Media type without parameters, lower-cased.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
