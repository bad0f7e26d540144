//! CSV upload widget: local validation, then a single multipart request.
mod backend;
mod controller;
mod format;
mod policy;

pub use backend::{
    FILE_FIELD, FilePick, HttpUploadBackend, SelectedFile, UploadBackend, UploadError, UploadReceipt,
};
pub use controller::{
    NO_FILE_MESSAGE, READ_ERROR_MESSAGE, SELECTED_MESSAGE, SUCCESS_MESSAGE, UNREACHABLE_MESSAGE, UPLOAD_LABEL,
    UPLOADING_LABEL, UploadController, UploadOutcome, UploadSurface,
};
pub use format::format_file_size;
pub use policy::{SelectionError, UploadPolicy};
