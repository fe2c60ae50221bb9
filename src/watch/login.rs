// ABOUTME: Login gate — decides from structural markers whether the operator is authenticated.
// ABOUTME: Terminal once it succeeds; the mutation subscription is dropped on return.

use futures::StreamExt;
use tracing::{debug, info};

use crate::config::SelectorProfile;
use crate::session::Session;
use crate::surface::DomSurface;

/// One authentication check against the current document tree.
///
/// Any logged-out marker present means not authenticated; an absent chat-list
/// container means the UI is still loading. Both are normal transient states,
/// not failures. On success sets `session.is_logged_in` (monotonic) and the
/// caller never re-invokes the check.
pub async fn check_login_status(
    surface: &dyn DomSurface,
    selectors: &SelectorProfile,
    session: &mut Session,
) -> bool {
    for marker in &selectors.logged_out_markers {
        if surface.query(marker).await.is_some() {
            debug!(%marker, "logged-out marker present");
            return false;
        }
    }
    if surface.query(&selectors.chat_list).await.is_none() {
        debug!("chat list not rendered yet, still loading");
        return false;
    }

    session.is_logged_in = true;
    info!("operator is logged in");
    true
}

/// Suspend until the login gate succeeds.
///
/// Checks once immediately, then once per mutation notification. Performs no
/// work between notifications. The subscription is dropped on every exit path.
pub async fn wait_for_login(
    surface: &dyn DomSurface,
    selectors: &SelectorProfile,
    session: &mut Session,
) -> anyhow::Result<()> {
    // Subscribe before the first check so no notification is lost in between.
    let mut mutations = surface.mutations();
    loop {
        if check_login_status(surface, selectors, session).await {
            return Ok(());
        }
        if mutations.next().await.is_none() {
            anyhow::bail!("mutation stream closed before login was observed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ScriptedSurface;

    #[tokio::test]
    async fn logged_out_marker_blocks() {
        let surface = ScriptedSurface::new();
        let selectors = SelectorProfile::default();
        surface.insert(&selectors.logged_out_markers[1], None);
        surface.insert(&selectors.chat_list, None);

        let mut session = Session::default();
        assert!(!check_login_status(&surface, &selectors, &mut session).await);
        assert!(!session.is_logged_in);
    }

    #[tokio::test]
    async fn missing_chat_list_means_still_loading() {
        let surface = ScriptedSurface::new();
        let selectors = SelectorProfile::default();

        let mut session = Session::default();
        assert!(!check_login_status(&surface, &selectors, &mut session).await);
        assert!(!session.is_logged_in);
    }

    #[tokio::test]
    async fn chat_list_present_means_logged_in() {
        let surface = ScriptedSurface::new();
        let selectors = SelectorProfile::default();
        surface.insert(&selectors.chat_list, None);

        let mut session = Session::default();
        assert!(check_login_status(&surface, &selectors, &mut session).await);
        assert!(session.is_logged_in);
    }

    #[tokio::test]
    async fn wait_for_login_resolves_on_later_mutation() {
        let surface = ScriptedSurface::new();
        let selectors = SelectorProfile::default();

        let waiter = {
            let surface = surface.clone();
            let selectors = selectors.clone();
            tokio::spawn(async move {
                let mut session = Session::default();
                wait_for_login(&surface, &selectors, &mut session).await?;
                anyhow::Ok(session.is_logged_in)
            })
        };

        // The QR code goes away and the chat list renders.
        tokio::task::yield_now().await;
        surface.insert(&selectors.chat_list, None);

        assert!(waiter.await.unwrap().unwrap());
    }
}
