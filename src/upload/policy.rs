use super::format::format_file_size;
use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Error: please select a valid {label} file.")]
    Extension { label: String },

    #[error("Error: the file cannot exceed {limit}.")]
    TooLarge { limit: String },
}

/// Which local files may be uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    extension: String,
    max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new("csv", 10 * 1024 * 1024)
    }
}

impl UploadPolicy {
    /// `extension` may be given with or without the leading dot.
    pub fn new(extension: &str, max_bytes: u64) -> Self {
        let bare = extension.trim().trim_start_matches('.').to_lowercase();
        Self {
            extension: format!(".{bare}"),
            max_bytes,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.allowed_extension, settings.max_file_size_bytes())
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn check(&self, name: &str, size: u64) -> Result<(), SelectionError> {
        if !name.to_lowercase().ends_with(&self.extension) {
            return Err(SelectionError::Extension {
                label: self.extension.trim_start_matches('.').to_uppercase(),
            });
        }
        if size > self.max_bytes {
            return Err(SelectionError::TooLarge {
                limit: format_file_size(self.max_bytes),
            });
        }
        Ok(())
    }
}
