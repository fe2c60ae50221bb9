// ABOUTME: Profile navigator — opens the profile sidebar, extracts the phone number, closes up.
// ABOUTME: Timer-driven bounded retry per stage; exhaustion surfaces as a typed NavigateError.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{RetryConfig, RetryPolicy, SelectorProfile, SidebarMissPolicy};
use crate::session::ChatKind;
use crate::surface::{DomSurface, NodeHandle};

/// Sentinel reported when the phone-number element renders empty.
pub const NUMBER_UNAVAILABLE: &str = "Phone number not available";

/// The navigator's stages, in order. Each is a bounded retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    OpenProfile,
    SidebarWait,
    NumberWait,
    Close,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::OpenProfile => "open-profile",
            Stage::SidebarWait => "sidebar-wait",
            Stage::NumberWait => "number-wait",
            Stage::Close => "close",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NavigateError {
    /// A stage's precondition never held within its retry budget.
    #[error("{stage} stage gave up after {attempts} attempts")]
    RetriesExhausted { stage: Stage, attempts: u32 },
    /// Only saved individual and business chats have a phone-number element.
    #[error("no phone-number selector for {0:?} chats")]
    UnsupportedKind(ChatKind),
    #[error(transparent)]
    Surface(#[from] anyhow::Error),
}

/// Navigates the host UI's profile sidebar for one classified chat.
pub struct ProfileNavigator<'a> {
    surface: &'a dyn DomSurface,
    selectors: &'a SelectorProfile,
    retry: &'a RetryConfig,
}

impl<'a> ProfileNavigator<'a> {
    pub fn new(
        surface: &'a dyn DomSurface,
        selectors: &'a SelectorProfile,
        retry: &'a RetryConfig,
    ) -> Self {
        Self {
            surface,
            selectors,
            retry,
        }
    }

    /// Open the sidebar, extract the phone number for `kind`, and close the
    /// sidebar again. Close runs on the failure paths too.
    pub async fn extract_phone_number(&self, kind: ChatKind) -> Result<String, NavigateError> {
        let number_selector = match kind {
            ChatKind::User => &self.selectors.phone_user,
            ChatKind::Business => &self.selectors.phone_business,
            other => return Err(NavigateError::UnsupportedKind(other)),
        };

        let outcome = self.open_and_extract(number_selector).await;
        self.close_sidebar().await;
        outcome
    }

    async fn open_and_extract(&self, number_selector: &str) -> Result<String, NavigateError> {
        self.open_sidebar().await?;
        let node = self
            .await_selector(Stage::NumberWait, number_selector, &self.retry.number_wait)
            .await?;
        let text = self
            .surface
            .text(&node)
            .await
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(text.unwrap_or_else(|| NUMBER_UNAVAILABLE.to_string()))
    }

    /// OpenProfile then SidebarWait, honoring the configured miss policy.
    async fn open_sidebar(&self) -> Result<(), NavigateError> {
        match self.retry.on_sidebar_miss {
            SidebarMissPolicy::Repoll => {
                self.open_profile().await?;
                self.await_selector(
                    Stage::SidebarWait,
                    &self.selectors.sidebar,
                    &self.retry.sidebar_wait,
                )
                .await?;
                Ok(())
            }
            SidebarMissPolicy::RestartProfile => {
                let policy = self.retry.sidebar_wait;
                let mut attempts = 0;
                loop {
                    self.open_profile().await?;
                    if self.surface.query(&self.selectors.sidebar).await.is_some() {
                        return Ok(());
                    }
                    attempts += 1;
                    if attempts >= policy.max_attempts {
                        return Err(NavigateError::RetriesExhausted {
                            stage: Stage::SidebarWait,
                            attempts,
                        });
                    }
                    debug!(attempt = attempts, "sidebar not rendered, restarting profile open");
                    tokio::time::sleep(policy.delay()).await;
                }
            }
        }
    }

    /// Find and click the profile-details control, then let the render settle.
    async fn open_profile(&self) -> Result<(), NavigateError> {
        let button = self
            .await_selector(
                Stage::OpenProfile,
                &self.selectors.profile_button,
                &self.retry.open_profile,
            )
            .await?;
        self.surface.click(&button).await?;
        tokio::time::sleep(Duration::from_millis(self.retry.settle_ms)).await;
        Ok(())
    }

    async fn await_selector(
        &self,
        stage: Stage,
        selector: &str,
        policy: &RetryPolicy,
    ) -> Result<NodeHandle, NavigateError> {
        let mut attempts = 0;
        loop {
            if let Some(node) = self.surface.query(selector).await {
                return Ok(node);
            }
            attempts += 1;
            if attempts >= policy.max_attempts {
                return Err(NavigateError::RetriesExhausted { stage, attempts });
            }
            debug!(%stage, %selector, attempt = attempts, "element not present, retrying");
            tokio::time::sleep(policy.delay()).await;
        }
    }

    /// Click the sidebar close control if present. Terminal regardless of
    /// outcome; failure to close is logged, never surfaced.
    async fn close_sidebar(&self) {
        match self.surface.query(&self.selectors.sidebar_close).await {
            Some(button) => {
                if let Err(e) = self.surface.click(&button).await {
                    warn!("failed to close the profile sidebar: {e}");
                }
            }
            None => debug!("sidebar close control not present"),
        }
    }
}
