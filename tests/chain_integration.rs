// ABOUTME: End-to-end chain tests — activation through classification to notification.
// ABOUTME: Drives the Assistant over a ScriptedSurface and asserts on MemoryNotifier output.

use std::sync::Arc;
use std::time::Duration;

use chatscout::app::Assistant;
use chatscout::config::{Config, RetryPolicy};
use chatscout::notify::MemoryNotifier;
use chatscout::surface::{ClickEffect, ScriptedSurface};

/// Default config with millisecond-scale delays so retry loops run fast.
fn fast_config() -> Config {
    let mut config = Config::default();
    let fast = RetryPolicy {
        max_attempts: 10,
        delay_ms: 1,
    };
    config.retry.open_profile = fast;
    config.retry.sidebar_wait = fast;
    config.retry.number_wait = fast;
    config.retry.settle_ms = 1;
    config.retry.chatbox_timeout_ms = 500;
    config
}

/// A surface that is already logged in with two conversation entries.
fn logged_in_surface(config: &Config) -> ScriptedSurface {
    let surface = ScriptedSurface::new();
    let s = &config.selectors;
    surface.insert(&s.chat_list, None);
    surface.insert(&s.chat_list_items, Some("Chat one"));
    surface.insert(&s.chat_list_items, Some("Chat two"));
    surface
}

/// Click the `index`-th conversation entry, waiting for the binder to attach
/// its activation handler first.
async fn activate_entry(surface: &ScriptedSurface, config: &Config, index: usize) {
    for _ in 0..1000 {
        if surface.activate(&config.selectors.chat_list_items, index) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("conversation entry {index} was never bound");
}

/// Wait until the notifier holds at least `count` messages.
async fn wait_for_messages(notifier: &MemoryNotifier, count: usize) -> Vec<String> {
    for _ in 0..2000 {
        let messages = notifier.messages();
        if messages.len() >= count {
            return messages;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!(
        "timed out waiting for {count} notifications, got {:?}",
        notifier.messages()
    );
}

#[tokio::test]
async fn saved_user_chat_extracts_phone_number() {
    let config = fast_config();
    let s = config.selectors.clone();
    let surface = logged_in_surface(&config);

    surface.insert(&s.chat_pane, None);
    surface.insert(&s.chat_title, Some("Alice Smith"));
    surface.insert(&s.chat_header, Some("Alice Smith"));
    surface.insert(&s.profile_button, None);
    surface.on_click(
        &s.profile_button,
        ClickEffect::Insert {
            selector: s.sidebar.clone(),
            text: None,
        },
    );
    surface.on_click(
        &s.profile_button,
        ClickEffect::Insert {
            selector: s.phone_user.clone(),
            text: Some("+1 415 555 0123".to_string()),
        },
    );
    surface.insert(&s.sidebar_close, None);
    surface.on_click(
        &s.sidebar_close,
        ClickEffect::Remove {
            selector: s.sidebar.clone(),
        },
    );

    let notifier = MemoryNotifier::new();
    let assistant = Assistant::new(
        Arc::new(surface.clone()),
        Arc::new(notifier.clone()),
        config.clone(),
    );
    let pipeline = tokio::spawn(async move { assistant.run().await });

    activate_entry(&surface, &config, 0).await;

    let messages = wait_for_messages(&notifier, 1).await;
    assert_eq!(
        messages[0],
        "Contact Name: Alice Smith\nPhone Number: +1 415 555 0123"
    );
    assert_eq!(surface.click_count(&s.profile_button), 1);
    assert_eq!(surface.click_count(&s.sidebar_close), 1);

    pipeline.abort();
}

#[tokio::test]
async fn unsaved_number_notifies_without_navigation() {
    let config = fast_config();
    let s = config.selectors.clone();
    let surface = logged_in_surface(&config);

    surface.insert(&s.chat_pane, None);
    surface.insert(&s.chat_title, Some("+14155550123"));
    surface.insert(&s.chat_header, Some("+14155550123"));

    let notifier = MemoryNotifier::new();
    let assistant = Assistant::new(
        Arc::new(surface.clone()),
        Arc::new(notifier.clone()),
        config.clone(),
    );
    let pipeline = tokio::spawn(async move { assistant.run().await });

    activate_entry(&surface, &config, 0).await;

    let messages = wait_for_messages(&notifier, 1).await;
    assert_eq!(
        messages[0],
        "This is a chat with an unsaved number.\nPhone Number: +14155550123"
    );
    // The profile navigator never touched the surface.
    assert_eq!(surface.query_count(&s.profile_button), 0);
    assert!(surface.clicks().is_empty());

    pipeline.abort();
}

#[tokio::test]
async fn group_chat_notifies_without_navigation() {
    let config = fast_config();
    let s = config.selectors.clone();
    let surface = logged_in_surface(&config);

    surface.insert(&s.chat_pane, None);
    surface.insert(&s.chat_title, Some("Family group"));
    surface.insert(&s.chat_header, Some("Family group\n12 participants"));

    let notifier = MemoryNotifier::new();
    let assistant = Assistant::new(
        Arc::new(surface.clone()),
        Arc::new(notifier.clone()),
        config.clone(),
    );
    let pipeline = tokio::spawn(async move { assistant.run().await });

    activate_entry(&surface, &config, 0).await;

    let messages = wait_for_messages(&notifier, 1).await;
    assert_eq!(messages[0], "This is a group chat.");
    assert_eq!(surface.query_count(&s.profile_button), 0);

    pipeline.abort();
}

#[tokio::test]
async fn chatbox_never_rendering_is_reported() {
    let mut config = fast_config();
    config.retry.chatbox_timeout_ms = 30;
    // Logged in, but no conversation pane ever renders.
    let surface = logged_in_surface(&config);

    let notifier = MemoryNotifier::new();
    let assistant = Assistant::new(
        Arc::new(surface.clone()),
        Arc::new(notifier.clone()),
        config.clone(),
    );
    let pipeline = tokio::spawn(async move { assistant.run().await });

    activate_entry(&surface, &config, 0).await;

    let messages = wait_for_messages(&notifier, 1).await;
    assert!(
        messages[0].starts_with("Chat box not opened"),
        "unexpected message: {}",
        messages[0]
    );

    pipeline.abort();
}

#[tokio::test]
async fn two_activations_run_serialized_in_order() {
    let config = fast_config();
    let s = config.selectors.clone();
    let surface = logged_in_surface(&config);

    surface.insert(&s.chat_pane, None);
    surface.insert(&s.chat_title, Some("Alice Smith"));
    surface.insert(&s.chat_header, Some("Alice Smith"));
    surface.insert(&s.profile_button, None);
    surface.on_click(
        &s.profile_button,
        ClickEffect::Insert {
            selector: s.sidebar.clone(),
            text: None,
        },
    );
    surface.on_click(
        &s.profile_button,
        ClickEffect::Insert {
            selector: s.phone_user.clone(),
            text: Some("+1 415 555 0123".to_string()),
        },
    );

    let notifier = MemoryNotifier::new();
    let assistant = Assistant::new(
        Arc::new(surface.clone()),
        Arc::new(notifier.clone()),
        config.clone(),
    );
    let pipeline = tokio::spawn(async move { assistant.run().await });

    // Second click lands while the first chain is still running: it queues
    // behind the first instead of racing it.
    activate_entry(&surface, &config, 0).await;
    assert!(surface.activate(&config.selectors.chat_list_items, 1));

    let messages = wait_for_messages(&notifier, 2).await;
    assert_eq!(messages.len(), 2);
    for message in &messages {
        assert_eq!(
            message,
            "Contact Name: Alice Smith\nPhone Number: +1 415 555 0123"
        );
    }
    // Each chain ran the navigator to completion before the next started.
    assert_eq!(surface.click_count(&s.profile_button), 2);

    pipeline.abort();
}

#[tokio::test]
async fn clearing_bindings_drains_the_pipeline_to_completion() {
    let config = fast_config();
    let s = config.selectors.clone();
    let surface = logged_in_surface(&config);

    surface.insert(&s.chat_pane, None);
    surface.insert(&s.chat_title, Some("Family group"));
    surface.insert(&s.chat_header, Some("Family group\n12 participants"));

    let notifier = MemoryNotifier::new();
    let assistant = Assistant::new(
        Arc::new(surface.clone()),
        Arc::new(notifier.clone()),
        config.clone(),
    );
    let pipeline = tokio::spawn(async move { assistant.run().await });

    activate_entry(&surface, &config, 0).await;
    let messages = wait_for_messages(&notifier, 1).await;
    assert_eq!(messages[0], "This is a group chat.");

    // Dropping the bindings closes the activation channel: run() returns Ok
    // on its own, no abort needed.
    surface.clear_bindings();
    let result = tokio::time::timeout(Duration::from_secs(1), pipeline).await;
    assert!(result.expect("pipeline should drain").expect("join").is_ok());
}

#[tokio::test]
async fn empty_chat_list_halts_without_binding() {
    let config = fast_config();
    let surface = ScriptedSurface::new();
    surface.insert(&config.selectors.chat_list, None);

    let notifier = MemoryNotifier::new();
    let assistant = Assistant::new(
        Arc::new(surface.clone()),
        Arc::new(notifier.clone()),
        config,
    );

    // Structural mismatch: run returns cleanly, nothing is notified.
    let result = tokio::time::timeout(Duration::from_secs(1), assistant.run()).await;
    assert!(result.expect("run should halt").is_ok());
    assert!(notifier.messages().is_empty());
}
