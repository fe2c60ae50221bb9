// ABOUTME: Chatbox observer — suspends until the conversation pane renders, then snapshots it.
// ABOUTME: Push-driven with a deadline; the pane never appearing is a typed, operator-visible failure.

use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, info};

use crate::classify::UNKNOWN_TITLE;
use crate::config::SelectorProfile;
use crate::session::ChatContext;
use crate::surface::DomSurface;

/// What the observer read from the freshly rendered conversation pane.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    /// Display title, `"Unknown"` when the title element was absent or empty.
    pub title: String,
    /// Full header text, if readable.
    pub header_text: Option<String>,
}

#[derive(Debug, Error)]
pub enum ChatboxError {
    #[error("conversation pane did not appear within {0:?}")]
    Timeout(Duration),
    #[error("mutation stream closed before the conversation pane appeared")]
    StreamClosed,
}

/// Wait for the conversation pane to render, then read its title and header.
///
/// Checks once immediately, then once per mutation notification — no timer
/// polling. On success sets `ctx.is_chatbox_open` and records the title in
/// `ctx.current_chat_title`; from that moment the context mirrors exactly what
/// the classifier will consume.
pub async fn observe_chatbox(
    surface: &dyn DomSurface,
    selectors: &SelectorProfile,
    ctx: &mut ChatContext,
    deadline: Duration,
) -> Result<ChatSnapshot, ChatboxError> {
    {
        // Subscribe before the first check so no notification is lost.
        let mut mutations = surface.mutations();
        let wait = tokio::time::timeout(deadline, async {
            loop {
                if surface.query(&selectors.chat_pane).await.is_some() {
                    return Ok(());
                }
                debug!("conversation pane not rendered yet");
                if mutations.next().await.is_none() {
                    return Err(ChatboxError::StreamClosed);
                }
            }
        })
        .await;
        match wait {
            Err(_) => return Err(ChatboxError::Timeout(deadline)),
            Ok(Err(e)) => return Err(e),
            Ok(Ok(())) => {}
        }
    }

    ctx.is_chatbox_open = true;

    let title = read_text(surface, &selectors.chat_title)
        .await
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let header_text = read_text(surface, &selectors.chat_header).await;

    ctx.current_chat_title = Some(title.clone());
    info!(%title, "conversation pane rendered");

    Ok(ChatSnapshot { title, header_text })
}

async fn read_text(surface: &dyn DomSurface, selector: &str) -> Option<String> {
    let node = surface.query(selector).await?;
    surface.text(&node).await.map(|t| t.trim().to_string())
}
