// ABOUTME: Configuration loading for chatscout.
// ABOUTME: Selector profile, retry policies, and delays from ~/.chatscout/config.toml.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selectors: SelectorProfile,
    pub retry: RetryConfig,
}

/// Structural markers of the host UI. Pure configuration data: when the host
/// UI's markup changes, only this profile needs updating.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorProfile {
    /// Any of these present means the operator is not authenticated yet.
    pub logged_out_markers: Vec<String>,
    /// Container holding the conversation side list.
    pub chat_list: String,
    /// One conversation entry in the side list.
    pub chat_list_items: String,
    /// The main conversation pane, present once a chat is opened.
    pub chat_pane: String,
    /// The opened chat's display title element.
    pub chat_title: String,
    /// The opened chat's full header (title plus surrounding markers).
    pub chat_header: String,
    /// Control that opens the profile sidebar.
    pub profile_button: String,
    /// The profile sidebar once rendered.
    pub sidebar: String,
    /// Phone-number element for saved individual contacts.
    pub phone_user: String,
    /// Phone-number element for saved business contacts.
    pub phone_business: String,
    /// Control that closes the profile sidebar.
    pub sidebar_close: String,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self {
            logged_out_markers: vec![
                r#"canvas[aria-label="Scan me!"]"#.to_string(),
                r#"div[data-testid="qr-code"]"#.to_string(),
                r#"div[data-testid="intro-text"]"#.to_string(),
                r#"div[class*="landing-wrapper"]"#.to_string(),
            ],
            chat_list: "#side".to_string(),
            chat_list_items: "#side [role=listitem]".to_string(),
            chat_pane: "#main".to_string(),
            chat_title: "#main ._amie ._amig".to_string(),
            chat_header: "#main ._amie".to_string(),
            profile_button: r#"#main header div[title="Profile details"][role="button"], #main header span[data-testid="default-user"]"#
                .to_string(),
            sidebar: "._aigv._aig-._aohg._arpo > .x10l6tqk.x13vifvy.xds687c.x1ey2m1c.x17qophe"
                .to_string(),
            phone_user: "span.x1jchvi3.x1fcty0u.x40yjcy".to_string(),
            phone_business:
                "._ao3e.selectable-text.copyable-text > .x1lkfr7t.xdbd6k5.x1fcty0u.xw2npq5"
                    .to_string(),
            sidebar_close: r#"._aigv._aig-._aohg._arpo span[data-icon="x"][aria-hidden="true"]"#
                .to_string(),
        }
    }
}

/// Retry policies and delays for the timer-driven parts of the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub open_profile: RetryPolicy,
    pub sidebar_wait: RetryPolicy,
    pub number_wait: RetryPolicy,
    /// Render-settle delay after clicking the profile control.
    pub settle_ms: u64,
    /// Deadline for the conversation pane to appear after an activation.
    pub chatbox_timeout_ms: u64,
    /// What a sidebar miss does: restart from the profile click, or re-poll
    /// the sidebar in place.
    pub on_sidebar_miss: SidebarMissPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            open_profile: RetryPolicy::default(),
            sidebar_wait: RetryPolicy::default(),
            number_wait: RetryPolicy::default(),
            settle_ms: 1000,
            chatbox_timeout_ms: 15_000,
            on_sidebar_miss: SidebarMissPolicy::RestartProfile,
        }
    }
}

/// Bounded retry: how many times a stage re-checks its precondition, and how
/// long it sleeps between checks.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            delay_ms: 500,
        }
    }
}

/// Policy for a sidebar that has not rendered after the profile click.
///
/// The host UI sometimes swallows the click, so the default restarts the whole
/// profile-open step (re-click) rather than re-polling a sidebar that may
/// never come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SidebarMissPolicy {
    /// Re-run the profile click before every re-check.
    RestartProfile,
    /// Re-check the sidebar in place.
    Repoll,
}

impl Config {
    /// Load config from ~/.chatscout/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatscout")
            .join("config.toml")
    }
}
