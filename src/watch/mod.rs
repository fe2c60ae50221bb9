// ABOUTME: Tree-watching primitives — login gate, chat-list binder, chatbox observer.
// ABOUTME: All push-driven: they suspend on mutation notifications and never poll timers.

pub mod binder;
pub mod chatbox;
pub mod login;

pub use binder::bind_chat_activations;
pub use chatbox::{ChatSnapshot, ChatboxError, observe_chatbox};
pub use login::{check_login_status, wait_for_login};
