// ABOUTME: Assistant orchestrator — login gate, chat-list binding, then serialized activation chains.
// ABOUTME: One chain at a time: observe chatbox → classify → branch to notifier or profile navigator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::Config;
use crate::navigate::ProfileNavigator;
use crate::notify::Notifier;
use crate::session::{ChatContext, ChatKind, Session};
use crate::surface::{Activation, DomSurface};
use crate::watch;

/// Top-level assistant that drives the whole pipeline over an injected surface.
pub struct Assistant {
    surface: Arc<dyn DomSurface>,
    notifier: Arc<dyn Notifier>,
    config: Config,
}

impl Assistant {
    pub fn new(surface: Arc<dyn DomSurface>, notifier: Arc<dyn Notifier>, config: Config) -> Self {
        Self {
            surface,
            notifier,
            config,
        }
    }

    /// Run the pipeline: wait for login, bind the chat list once, then process
    /// activations one at a time until every activation sender is gone.
    ///
    /// Activations are serialized through the channel: a click that lands
    /// while a chain is running queues behind it instead of racing it. Each
    /// chain gets a fresh `ChatContext`.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut session = Session::default();
        watch::wait_for_login(self.surface.as_ref(), &self.config.selectors, &mut session).await?;

        let (events, mut activations) = mpsc::channel::<Activation>(16);
        let bound =
            watch::bind_chat_activations(self.surface.as_ref(), &self.config.selectors, events)
                .await?;
        if bound == 0 {
            // Structural mismatch, already logged. Halt without retrying.
            return Ok(());
        }

        while let Some(activation) = activations.recv().await {
            self.run_chain(&activation).await;
        }
        info!("all activation bindings dropped, pipeline done");
        Ok(())
    }

    /// One end-to-end chain for a single activation. Failures are handled at
    /// the point of detection; nothing propagates out of the chain.
    async fn run_chain(&self, activation: &Activation) {
        debug!(entry = %activation.entry.0, "chat activated");
        let mut ctx = ChatContext::default();

        let deadline = Duration::from_millis(self.config.retry.chatbox_timeout_ms);
        let snapshot = match watch::observe_chatbox(
            self.surface.as_ref(),
            &self.config.selectors,
            &mut ctx,
            deadline,
        )
        .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("chatbox never opened: {e}");
                self.say(&format!("Chat box not opened - {e}")).await;
                return;
            }
        };

        let result = classify(snapshot.header_text.as_deref(), Some(&snapshot.title));
        debug!(?result, title = %snapshot.title, "chat classified");

        match result.kind {
            ChatKind::Group => self.say("This is a group chat.").await,
            ChatKind::Unknown => {
                // Unsaved contact: the title already is the phone number.
                self.say(&format!(
                    "This is a chat with an unsaved number.\nPhone Number: {}",
                    snapshot.title
                ))
                .await;
            }
            ChatKind::User | ChatKind::Business => {
                let navigator = ProfileNavigator::new(
                    self.surface.as_ref(),
                    &self.config.selectors,
                    &self.config.retry,
                );
                match navigator.extract_phone_number(result.kind).await {
                    Ok(number) => {
                        self.say(&format!(
                            "Contact Name: {}\nPhone Number: {}",
                            snapshot.title, number
                        ))
                        .await;
                    }
                    Err(e) => {
                        warn!("profile navigation failed: {e}");
                        self.say(&format!("Could not extract the phone number: {e}")).await;
                    }
                }
            }
        }
    }

    async fn say(&self, message: &str) {
        info!(%message, "notifying operator");
        if let Err(e) = self.notifier.notify(message).await {
            warn!("notifier failed: {e}");
        }
    }
}
