use super::backend::{FilePick, SelectedFile, UploadBackend, UploadError, UploadReceipt};
use super::format::format_file_size;
use super::policy::UploadPolicy;
use crate::types::NoticeKind;
use std::future::Future;
use tracing::{error, info, warn};

pub const SELECTED_MESSAGE: &str = "File selected successfully!";
pub const NO_FILE_MESSAGE: &str = "Error: no file selected.";
pub const READ_ERROR_MESSAGE: &str = "Error: the selected file could not be read.";
pub const SUCCESS_MESSAGE: &str = "File uploaded and processed successfully!";
pub const UNREACHABLE_MESSAGE: &str =
    "Error: backend is not available. Configure the server first.";
pub const UPLOAD_LABEL: &str = "Upload to database";
pub const UPLOADING_LABEL: &str = "Uploading...";

pub trait UploadSurface {
    fn show_message(&mut self, text: &str, kind: NoticeKind);
    fn hide_message(&mut self);
    fn show_file_info(&mut self, name: &str, size_label: &str);
    fn hide_file_info(&mut self);
    /// Forget whatever the file picker currently holds.
    fn clear_picker(&mut self);
    fn set_upload_enabled(&mut self, enabled: bool);
    fn set_upload_label(&mut self, label: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    NothingSelected,
    Uploaded(UploadReceipt),
    Failed,
}

pub struct UploadController<B> {
    backend: B,
    policy: UploadPolicy,
    selected: Option<SelectedFile>,
}

impl<B: UploadBackend> UploadController<B> {
    pub fn new(backend: B, policy: UploadPolicy) -> Self {
        Self {
            backend,
            policy,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Returns whether the file became the pending upload.
    ///
    /// `load` only runs once the name and size pass the policy, so an
    /// oversized pick is never read into memory.
    pub async fn select_file<S, F, Fut>(
        &mut self,
        surface: &mut S,
        pick: Option<FilePick>,
        load: F,
    ) -> bool
    where
        S: UploadSurface,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<Vec<u8>>>,
    {
        surface.hide_message();
        let Some(pick) = pick else {
            return false;
        };

        if let Err(err) = self.policy.check(&pick.name, pick.size) {
            warn!(name = %pick.name, size = pick.size, %err, "rejected file selection");
            surface.show_message(&err.to_string(), NoticeKind::Error);
            self.reset_selection(surface);
            return false;
        }

        let Some(data) = load().await else {
            self.report_unreadable(surface);
            return false;
        };
        let file = SelectedFile::new(pick.name, data);
        // The picker's size can be stale by the time the bytes are read.
        if let Err(err) = self.policy.check(&file.name, file.size) {
            warn!(name = %file.name, size = file.size, %err, "file grew past the limit");
            surface.show_message(&err.to_string(), NoticeKind::Error);
            self.reset_selection(surface);
            return false;
        }

        surface.show_file_info(&file.name, &format_file_size(file.size));
        surface.set_upload_enabled(true);
        surface.show_message(SELECTED_MESSAGE, NoticeKind::Info);
        self.selected = Some(file);
        true
    }

    /// The picker reported a file whose metadata or contents are unavailable.
    pub fn report_unreadable<S: UploadSurface>(&mut self, surface: &mut S) {
        warn!("selected file could not be read");
        surface.show_message(READ_ERROR_MESSAGE, NoticeKind::Error);
        self.reset_selection(surface);
    }

    pub async fn submit<S: UploadSurface>(&mut self, surface: &mut S) -> UploadOutcome {
        let Some(file) = self.selected.as_ref() else {
            surface.show_message(NO_FILE_MESSAGE, NoticeKind::Error);
            return UploadOutcome::NothingSelected;
        };

        surface.set_upload_enabled(false);
        surface.set_upload_label(UPLOADING_LABEL);

        let outcome = match self.backend.upload(file).await {
            Ok(receipt) => {
                info!(
                    name = %file.name,
                    rows = ?receipt.rows_processed,
                    "upload processed"
                );
                surface.show_message(SUCCESS_MESSAGE, NoticeKind::Success);
                self.reset_selection(surface);
                UploadOutcome::Uploaded(receipt)
            }
            Err(err) => {
                error!(%err, "upload failed");
                let text = match &err {
                    UploadError::Connection(_) => UNREACHABLE_MESSAGE.to_string(),
                    other => format!("Error uploading file: {other}"),
                };
                surface.show_message(&text, NoticeKind::Error);
                surface.set_upload_enabled(true);
                UploadOutcome::Failed
            }
        };

        surface.set_upload_label(UPLOAD_LABEL);
        outcome
    }

    fn reset_selection<S: UploadSurface>(&mut self, surface: &mut S) {
        self.selected = None;
        surface.clear_picker();
        surface.hide_file_info();
        surface.set_upload_enabled(false);
    }
}
