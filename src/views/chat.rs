use crate::chat::{ChatController, ChatSurface, GREETING, HttpChatBackend};
use crate::config::SETTINGS;
use crate::types::{ChatMessage, Role};
use crate::views::shared::format_message_timestamp;
use dioxus::events::Key;
use dioxus::prelude::*;

const SCROLL_SCRIPT: &str = r#"
const list = document.getElementById("chatMessages");
if (list) { list.scrollTop = list.scrollHeight; }
"#;
const FOCUS_SCRIPT: &str = r#"document.getElementById("chatInput")?.focus();"#;

/// Signals behind the chat page. Scroll and focus are requests observed by
/// effects, so they run after the DOM has the new content.
#[derive(Clone, Copy)]
struct SignalChatSurface {
    messages: Signal<Vec<ChatMessage>>,
    typing: Signal<bool>,
    input: Signal<String>,
    input_enabled: Signal<bool>,
    scroll_requests: Signal<u64>,
    focus_requests: Signal<u64>,
}

impl ChatSurface for SignalChatSurface {
    fn append_message(&mut self, role: Role, text: &str) -> usize {
        let mut index = 0;
        self.messages.with_mut(|msgs| {
            index = msgs.len();
            msgs.push(ChatMessage::new(role, text));
        });
        self.scroll_to_bottom();
        index
    }

    fn set_message_text(&mut self, index: usize, text: &str) {
        self.messages.with_mut(|msgs| {
            if let Some(msg) = msgs.get_mut(index) {
                msg.content = text.to_string();
            }
        });
    }

    fn show_typing(&mut self) {
        self.typing.set(true);
        self.scroll_to_bottom();
    }

    fn hide_typing(&mut self) {
        self.typing.set(false);
    }

    fn scroll_to_bottom(&mut self) {
        *self.scroll_requests.write() += 1;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled.set(enabled);
    }

    fn clear_input(&mut self) {
        self.input.set(String::new());
    }

    fn focus_input(&mut self) {
        *self.focus_requests.write() += 1;
    }

    fn clear_messages(&mut self) {
        self.messages.set(Vec::new());
    }
}

#[component]
pub fn ChatView() -> Element {
    let messages = use_signal(|| vec![ChatMessage::new(Role::Bot, GREETING)]);
    let mut input = use_signal(String::new);
    let typing = use_signal(|| false);
    let input_enabled = use_signal(|| true);
    let scroll_requests = use_signal(|| 0u64);
    let focus_requests = use_signal(|| 0u64);
    // Taken out while a send or clear is in flight.
    let controller =
        use_signal(|| Some(ChatController::new(HttpChatBackend::from_settings(&SETTINGS))));

    use_effect(move || {
        let _ = scroll_requests();
        let _ = document::eval(SCROLL_SCRIPT);
    });
    use_effect(move || {
        let _ = focus_requests();
        let _ = document::eval(FOCUS_SCRIPT);
    });

    let surface = SignalChatSurface {
        messages,
        typing,
        input,
        input_enabled,
        scroll_requests,
        focus_requests,
    };

    let mut send_message = {
        let mut controller = controller;
        move |text: String| {
            let Some(mut chat) = controller.write().take() else {
                return;
            };
            let mut surface = surface;
            spawn(async move {
                chat.send_message(&mut surface, &text).await;
                controller.set(Some(chat));
            });
        }
    };

    let mut clear_session = {
        let mut controller = controller;
        move || {
            let Some(mut chat) = controller.write().take() else {
                return;
            };
            let mut surface = surface;
            spawn(async move {
                chat.clear_session(&mut surface).await;
                controller.set(Some(chat));
            });
        }
    };

    let messages_snapshot = messages();
    let enabled = input_enabled();

    rsx! {
        div { class: "chat-container",
            div { class: "chat-header",
                h2 { class: "section-title", "Data assistant" }
                button {
                    id: "btnClear", class: "btn btn-ghost", r#type: "button",
                    disabled: !enabled,
                    onclick: move |_| clear_session(),
                    "Clear conversation"
                }
            }
            div { id: "chatMessages", class: "chat-messages",
                for (i, msg) in messages_snapshot.iter().enumerate() {
                    MessageBubble { key: "{i}", message: msg.clone() }
                }
                if typing() {
                    div { id: "typingIndicator", class: "typing-indicator",
                        span {}
                        span {}
                        span {}
                    }
                }
            }
            div { class: "chat-input-area",
                textarea {
                    id: "chatInput", rows: "1",
                    placeholder: "Ask something about the uploaded data...",
                    value: "{input}",
                    disabled: !enabled,
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            send_message(input());
                        }
                    },
                }
                button {
                    id: "btnSend", class: "btn btn-primary", r#type: "button",
                    disabled: !enabled,
                    onclick: move |_| send_message(input()),
                    "Send"
                }
            }
        }
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> Element {
    let timestamp = format_message_timestamp(message.created_at);
    rsx! {
        div { class: format_args!("message-bubble {}", message.role.css_class()),
            p { "{message.content}" }
            if let Some(ts) = timestamp {
                span { class: "message-timestamp", "{ts}" }
            }
        }
    }
}
