// ABOUTME: Chat list binder — attaches activation delivery to every visible conversation entry.
// ABOUTME: Runs exactly once, after the login gate first succeeds.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::SelectorProfile;
use crate::surface::{Activation, DomSurface};

/// Bind an activation sender to every conversation entry in the side list and
/// return how many were bound.
///
/// An empty side list after a successful login is a structural mismatch: it is
/// logged and reported as zero, and the caller does not retry.
pub async fn bind_chat_activations(
    surface: &dyn DomSurface,
    selectors: &SelectorProfile,
    events: mpsc::Sender<Activation>,
) -> anyhow::Result<usize> {
    let entries = surface.query_all(&selectors.chat_list_items).await;
    if entries.is_empty() {
        warn!(selector = %selectors.chat_list_items, "no conversation entries found");
        return Ok(0);
    }

    info!(count = entries.len(), "binding activation handlers to conversation entries");
    for entry in &entries {
        surface.bind_activation(entry, events.clone()).await?;
    }
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ScriptedSurface;

    #[tokio::test]
    async fn empty_list_binds_nothing() {
        let surface = ScriptedSurface::new();
        let selectors = SelectorProfile::default();
        let (tx, _rx) = mpsc::channel(4);

        let bound = bind_chat_activations(&surface, &selectors, tx).await.unwrap();
        assert_eq!(bound, 0);
    }

    #[tokio::test]
    async fn binds_every_entry() {
        let surface = ScriptedSurface::new();
        let selectors = SelectorProfile::default();
        surface.insert(&selectors.chat_list_items, Some("Alice Smith"));
        surface.insert(&selectors.chat_list_items, Some("Family group"));
        let (tx, mut rx) = mpsc::channel(4);

        let bound = bind_chat_activations(&surface, &selectors, tx).await.unwrap();
        assert_eq!(bound, 2);

        surface.activate(&selectors.chat_list_items, 1);
        assert!(rx.recv().await.is_some());
    }
}
