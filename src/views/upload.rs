use crate::config::SETTINGS;
use crate::types::NoticeKind;
use crate::upload::{
    FilePick, HttpUploadBackend, UPLOAD_LABEL, UploadController, UploadPolicy, UploadSurface,
};
use crate::views::shared::display_file_name;
use dioxus::html::HasFileData;
use dioxus::prelude::*;
use tracing::debug;

const CLEAR_PICKER_SCRIPT: &str = r#"
const picker = document.getElementById("csvFile");
if (picker) { picker.value = ""; }
"#;

#[derive(Clone, Copy)]
struct SignalUploadSurface {
    notice: Signal<Option<(String, NoticeKind)>>,
    file_info: Signal<Option<(String, String)>>,
    picker_resets: Signal<u64>,
    upload_enabled: Signal<bool>,
    upload_label: Signal<String>,
}

impl UploadSurface for SignalUploadSurface {
    fn show_message(&mut self, text: &str, kind: NoticeKind) {
        self.notice.set(Some((text.to_string(), kind)));
    }

    fn hide_message(&mut self) {
        self.notice.set(None);
    }

    fn show_file_info(&mut self, name: &str, size_label: &str) {
        self.file_info
            .set(Some((name.to_string(), size_label.to_string())));
    }

    fn hide_file_info(&mut self) {
        self.file_info.set(None);
    }

    fn clear_picker(&mut self) {
        *self.picker_resets.write() += 1;
    }

    fn set_upload_enabled(&mut self, enabled: bool) {
        self.upload_enabled.set(enabled);
    }

    fn set_upload_label(&mut self, label: &str) {
        self.upload_label.set(label.to_string());
    }
}

#[component]
pub fn UploadView() -> Element {
    let notice = use_signal(|| Option::<(String, NoticeKind)>::None);
    let file_info = use_signal(|| Option::<(String, String)>::None);
    let picker_resets = use_signal(|| 0u64);
    let upload_enabled = use_signal(|| false);
    let upload_label = use_signal(|| UPLOAD_LABEL.to_string());
    let policy = UploadPolicy::from_settings(&SETTINGS);
    let accept = policy.extension().to_string();
    let label = accept.trim_start_matches('.').to_uppercase();
    // Taken out while an upload is in flight.
    let controller = use_signal(move || {
        Some(UploadController::new(
            HttpUploadBackend::from_settings(&SETTINGS),
            policy,
        ))
    });

    use_effect(move || {
        let _ = picker_resets();
        let _ = document::eval(CLEAR_PICKER_SCRIPT);
    });

    let surface = SignalUploadSurface {
        notice,
        file_info,
        picker_resets,
        upload_enabled,
        upload_label,
    };

    let on_file_change = {
        let mut controller = controller;
        move |evt: FormEvent| {
            let engine = evt.files();
            let mut surface = surface;
            spawn(async move {
                let Some(mut uploads) = controller.write().take() else {
                    debug!("upload in flight, ignoring picker change");
                    return;
                };
                let path = engine
                    .as_ref()
                    .and_then(|engine| engine.files().into_iter().next());
                match (engine, path) {
                    (Some(engine), Some(path)) => match engine.file_size(&path).await {
                        Some(size) => {
                            let pick = FilePick::new(display_file_name(&path), size);
                            uploads
                                .select_file(&mut surface, Some(pick), || async move {
                                    engine.read_file(&path).await
                                })
                                .await;
                        }
                        None => uploads.report_unreadable(&mut surface),
                    },
                    _ => {
                        uploads.select_file(&mut surface, None, || async { None }).await;
                    }
                }
                controller.set(Some(uploads));
            });
        }
    };

    let on_upload = {
        let mut controller = controller;
        move |_: MouseEvent| {
            let Some(mut uploads) = controller.write().take() else {
                return;
            };
            let mut surface = surface;
            spawn(async move {
                uploads.submit(&mut surface).await;
                controller.set(Some(uploads));
            });
        }
    };

    rsx! {
        div { class: "upload-container",
            div { id: "uploadArea", class: "upload-area",
                p { "Select a {label} file to load into the database" }
                input {
                    id: "csvFile", r#type: "file", accept: "{accept}",
                    onchange: on_file_change,
                }
            }
            if let Some((name, size)) = file_info() {
                div { id: "fileInfo", class: "file-info",
                    p { strong { "File: " } span { id: "fileName", "{name}" } }
                    p { strong { "Size: " } span { id: "fileSize", "{size}" } }
                }
            }
            button {
                id: "btnUpload", class: "btn btn-primary", r#type: "button",
                disabled: !upload_enabled(),
                onclick: on_upload,
                "{upload_label}"
            }
            if let Some((text, kind)) = notice() {
                div { id: "message", class: kind.css_class(), "{text}" }
            }
        }
    }
}
