// ABOUTME: Session and per-chain context state, plus the chat classification result types.
// ABOUTME: One ChatContext per activation chain — chains never share mutable state.

/// Process-wide session state.
///
/// `is_logged_in` is monotonic: the login gate sets it true exactly once and
/// nothing ever resets it.
#[derive(Debug, Default)]
pub struct Session {
    pub is_logged_in: bool,
}

/// State owned by a single activation chain.
///
/// The chain creates a fresh context when a conversation entry is activated,
/// so a second activation queued behind a running chain can never overwrite
/// the running chain's fields.
#[derive(Debug, Default)]
pub struct ChatContext {
    /// True from the moment the chatbox observer sees the conversation pane.
    pub is_chatbox_open: bool,
    /// The chat's display title (a contact name, or the raw phone number for
    /// unsaved contacts). Valid from chatbox resolution until the chain ends,
    /// and always equal to the title the classifier consumed.
    pub current_chat_title: Option<String>,
}

/// What kind of conversation the classifier decided this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// A saved individual contact.
    User,
    /// A saved business contact.
    Business,
    /// A group conversation.
    Group,
    /// An unsaved contact — the title is a raw phone number.
    Unknown,
}

/// Classification of one opened chat. Immutable, one per activation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatResult {
    pub is_saved: bool,
    pub kind: ChatKind,
}
