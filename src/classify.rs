// ABOUTME: Chat classifier — pure function from (header text, chat title) to a ChatResult.
// ABOUTME: A title matching the phone grammar means an unsaved contact; saved kinds follow a fixed priority.

use std::sync::LazyLock;

use regex::Regex;

use crate::session::{ChatKind, ChatResult};

/// Display title used when the host UI never rendered a readable title.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// A plausible international phone number: optional leading `+`, 1–4 digits,
/// then 6–14 further digit groups each optionally separated by a single space
/// or hyphen, ending on a digit.
static PHONE_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{1,4}[\s-]?(\d[\s-]?){6,14}\d$").expect("phone grammar"));

/// Whether a chat title is a raw phone number rather than a saved contact name.
pub fn is_phone_number(title: &str) -> bool {
    PHONE_GRAMMAR.is_match(title)
}

/// Classify an opened chat from its header text and display title.
///
/// A `None` title is treated as the literal `"Unknown"` (a saved name); a
/// `None` header as empty text. For saved chats the kind checks run in a fixed
/// priority — `"group"` before `"Business"` before the `User` default — so a
/// business group's header, which can contain both markers, classifies as a
/// group. Both substring checks are case-sensitive.
pub fn classify(header_text: Option<&str>, chat_title: Option<&str>) -> ChatResult {
    let title = chat_title.unwrap_or(UNKNOWN_TITLE);
    let is_saved = !is_phone_number(title);

    let kind = if is_saved {
        let header = header_text.unwrap_or("");
        if header.contains("group") {
            ChatKind::Group
        } else if header.contains("Business") {
            ChatKind::Business
        } else {
            ChatKind::User
        }
    } else {
        ChatKind::Unknown
    };

    ChatResult { is_saved, kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_grammar_accepts_international_shapes() {
        assert!(is_phone_number("+1 650-555-0123"));
        assert!(is_phone_number("919876543210"));
        assert!(is_phone_number("+91 98765 43210"));
        assert!(is_phone_number("0044 20 7946 0958"));
    }

    #[test]
    fn phone_grammar_rejects_names_and_short_strings() {
        assert!(!is_phone_number("Alice Smith"));
        assert!(!is_phone_number("12345"));
        assert!(!is_phone_number("+1"));
        assert!(!is_phone_number("call me at 919876543210"));
        assert!(!is_phone_number(""));
    }

    #[test]
    fn phone_title_is_unsaved_unknown() {
        let result = classify(Some("+14155550123"), Some("+14155550123"));
        assert!(!result.is_saved);
        assert_eq!(result.kind, ChatKind::Unknown);
    }

    #[test]
    fn unsaved_ignores_header_markers() {
        // Header content never promotes an unsaved chat out of Unknown.
        let result = classify(Some("Business group"), Some("919876543210"));
        assert!(!result.is_saved);
        assert_eq!(result.kind, ChatKind::Unknown);
    }

    #[test]
    fn saved_name_defaults_to_user() {
        let result = classify(Some("Alice Smith"), Some("Alice Smith"));
        assert!(result.is_saved);
        assert_eq!(result.kind, ChatKind::User);
    }

    #[test]
    fn group_marker_wins_over_business() {
        // Priority is fixed: a business group's header carries both markers.
        let result = classify(Some("Acme Business group"), Some("Acme"));
        assert!(result.is_saved);
        assert_eq!(result.kind, ChatKind::Group);
    }

    #[test]
    fn business_marker_without_group() {
        let result = classify(Some("Acme Business"), Some("Acme"));
        assert_eq!(result.kind, ChatKind::Business);
    }

    #[test]
    fn markers_are_case_sensitive() {
        assert_eq!(classify(Some("Family Group"), Some("Family")).kind, ChatKind::User);
        assert_eq!(classify(Some("Acme business"), Some("Acme")).kind, ChatKind::User);
    }

    #[test]
    fn missing_title_is_a_saved_unknown_name() {
        let result = classify(None, None);
        assert!(result.is_saved);
        assert_eq!(result.kind, ChatKind::User);
    }

    #[test]
    fn classifier_is_idempotent() {
        let a = classify(Some("Family group"), Some("Family group"));
        let b = classify(Some("Family group"), Some("Family group"));
        assert_eq!(a, b);
    }
}
