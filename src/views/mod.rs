pub mod chat;
pub mod shared;
pub mod upload;

pub use chat::ChatView;
pub use upload::UploadView;
