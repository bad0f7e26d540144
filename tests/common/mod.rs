#![allow(dead_code)]

use portal::chat::ChatSurface;
use portal::types::{NoticeKind, Role};
use portal::upload::UploadSurface;

/// Chat page stand-in that records what the controller did to it.
#[derive(Default)]
pub struct RecordingChat {
    pub messages: Vec<(Role, String)>,
    pub typing: bool,
    pub input_enabled: bool,
    pub disabled_count: usize,
    pub scrolls: usize,
}

impl RecordingChat {
    pub fn texts(&self, role: Role) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl ChatSurface for RecordingChat {
    fn append_message(&mut self, role: Role, text: &str) -> usize {
        self.messages.push((role, text.to_string()));
        self.messages.len() - 1
    }

    fn set_message_text(&mut self, index: usize, text: &str) {
        self.messages[index].1 = text.to_string();
    }

    fn show_typing(&mut self) {
        self.typing = true;
    }

    fn hide_typing(&mut self) {
        self.typing = false;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.disabled_count += 1;
        }
        self.input_enabled = enabled;
    }

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}

    fn clear_messages(&mut self) {
        self.messages.clear();
    }
}

#[derive(Default)]
pub struct RecordingUpload {
    pub message: Option<(String, NoticeKind)>,
    pub file_info: Option<(String, String)>,
    pub upload_enabled: bool,
    pub label: String,
}

impl UploadSurface for RecordingUpload {
    fn show_message(&mut self, text: &str, kind: NoticeKind) {
        self.message = Some((text.to_string(), kind));
    }

    fn hide_message(&mut self) {
        self.message = None;
    }

    fn show_file_info(&mut self, name: &str, size_label: &str) {
        self.file_info = Some((name.to_string(), size_label.to_string()));
    }

    fn hide_file_info(&mut self) {
        self.file_info = None;
    }

    fn clear_picker(&mut self) {}

    fn set_upload_enabled(&mut self, enabled: bool) {
        self.upload_enabled = enabled;
    }

    fn set_upload_label(&mut self, label: &str) {
        self.label = label.to_string();
    }
}

/// An address nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
