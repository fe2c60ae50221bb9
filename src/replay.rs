// ABOUTME: Replay driver — applies a JSON step script to a ScriptedSurface while the pipeline runs.
// ABOUTME: Lets selector profiles and chain behavior be exercised without the live host UI.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::surface::{ClickEffect, ScriptedSurface};

/// A replay script: steps applied to the surface in order.
///
/// Scripts should end with a `wait` long enough for the last chain to finish,
/// since the driver exits when the script does.
#[derive(Debug, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// One scripted change to the simulated host UI.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Insert an element (with optional rendered text); emits a mutation.
    Insert {
        selector: String,
        #[serde(default)]
        text: Option<String>,
    },
    /// Remove every element under the selector; emits a mutation.
    Remove { selector: String },
    /// Register effects applied whenever an element under `selector` is clicked.
    OnClick {
        selector: String,
        effects: Vec<EffectSpec>,
    },
    /// Simulate the operator clicking the `index`-th entry under `selector`.
    Activate {
        selector: String,
        #[serde(default)]
        index: usize,
    },
    /// Pause the script.
    Wait { ms: u64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSpec {
    Insert {
        selector: String,
        #[serde(default)]
        text: Option<String>,
    },
    Remove { selector: String },
}

impl From<EffectSpec> for ClickEffect {
    fn from(spec: EffectSpec) -> Self {
        match spec {
            EffectSpec::Insert { selector, text } => ClickEffect::Insert { selector, text },
            EffectSpec::Remove { selector } => ClickEffect::Remove { selector },
        }
    }
}

/// Load a replay script from a JSON file.
pub fn load_script(path: &Path) -> anyhow::Result<Script> {
    let content = std::fs::read_to_string(path)?;
    let script: Script = serde_json::from_str(&content)?;
    Ok(script)
}

/// Apply every step of the script to the surface, in order.
pub async fn run_script(surface: &ScriptedSurface, script: Script) {
    for step in script.steps {
        debug!(?step, "applying replay step");
        match step {
            Step::Insert { selector, text } => {
                surface.insert(&selector, text.as_deref());
            }
            Step::Remove { selector } => surface.remove(&selector),
            Step::OnClick { selector, effects } => {
                for effect in effects {
                    surface.on_click(&selector, effect.into());
                }
            }
            Step::Activate { selector, index } => {
                if !surface.activate(&selector, index) {
                    warn!(%selector, index, "activation not delivered, is the entry bound yet?");
                }
            }
            Step::Wait { ms } => tokio::time::sleep(std::time::Duration::from_millis(ms)).await,
        }
    }
}
