// ABOUTME: In-memory scripted DomSurface for the replay driver and integration tests.
// ABOUTME: Inserts/removals emit mutations; clicks apply scripted effects; entries can be activated.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::warn;

use super::dom::{Activation, DomSurface, Mutation, NodeHandle};

/// A scripted change applied to the surface when an element is clicked.
#[derive(Debug, Clone)]
pub enum ClickEffect {
    /// Insert an element with optional rendered text.
    Insert {
        selector: String,
        text: Option<String>,
    },
    /// Remove every element registered under the selector.
    Remove { selector: String },
}

struct NodeEntry {
    handle: NodeHandle,
    text: Option<String>,
    /// Queries for this node's selector report it only from this (1-based)
    /// query count on. Zero means always visible.
    visible_after: u32,
}

#[derive(Default)]
struct Inner {
    nodes: HashMap<String, Vec<NodeEntry>>,
    origins: HashMap<NodeHandle, String>,
    query_counts: HashMap<String, u32>,
    clicks: Vec<NodeHandle>,
    click_effects: HashMap<String, Vec<ClickEffect>>,
    bindings: HashMap<NodeHandle, mpsc::Sender<Activation>>,
    watchers: Vec<mpsc::UnboundedSender<Mutation>>,
    next_id: u64,
}

impl Inner {
    fn insert_node(&mut self, selector: &str, text: Option<&str>, visible_after: u32) -> NodeHandle {
        self.next_id += 1;
        let handle = NodeHandle(format!("{selector}::{}", self.next_id));
        self.nodes.entry(selector.to_string()).or_default().push(NodeEntry {
            handle: handle.clone(),
            text: text.map(str::to_string),
            visible_after,
        });
        self.origins.insert(handle.clone(), selector.to_string());
        handle
    }

    fn remove_selector(&mut self, selector: &str) {
        if let Some(entries) = self.nodes.remove(selector) {
            for entry in entries {
                self.origins.remove(&entry.handle);
                self.bindings.remove(&entry.handle);
            }
        }
    }

    fn notify_watchers(&mut self) {
        self.watchers.retain(|tx| tx.send(Mutation).is_ok());
    }
}

/// Scripted document tree. Selector matching is exact string equality, not
/// CSS semantics: a node inserted under a selector is found only by queries
/// for that same selector string.
#[derive(Clone, Default)]
pub struct ScriptedSurface {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("surface lock poisoned")
    }

    /// Insert an element and emit a mutation notification.
    pub fn insert(&self, selector: &str, text: Option<&str>) -> NodeHandle {
        let mut inner = self.lock();
        let handle = inner.insert_node(selector, text, 0);
        inner.notify_watchers();
        handle
    }

    /// Insert an element that queries only report from the `nth_query`-th
    /// query for its selector onward. Exercises retry loops.
    pub fn insert_visible_after(
        &self,
        selector: &str,
        text: Option<&str>,
        nth_query: u32,
    ) -> NodeHandle {
        let mut inner = self.lock();
        let handle = inner.insert_node(selector, text, nth_query);
        inner.notify_watchers();
        handle
    }

    /// Remove every element under the selector and emit a mutation.
    pub fn remove(&self, selector: &str) {
        let mut inner = self.lock();
        inner.remove_selector(selector);
        inner.notify_watchers();
    }

    /// Register an effect applied every time an element under `selector` is clicked.
    pub fn on_click(&self, selector: &str, effect: ClickEffect) {
        self.lock()
            .click_effects
            .entry(selector.to_string())
            .or_default()
            .push(effect);
    }

    /// Simulate the operator clicking the `index`-th entry under `selector`.
    /// Returns whether an activation was delivered (the entry exists, has a
    /// binding, and the queue accepted it).
    pub fn activate(&self, selector: &str, index: usize) -> bool {
        let inner = self.lock();
        let Some(entry) = inner.nodes.get(selector).and_then(|entries| entries.get(index)) else {
            warn!(%selector, index, "no such entry to activate");
            return false;
        };
        match inner.bindings.get(&entry.handle) {
            Some(tx) => tx
                .try_send(Activation {
                    entry: entry.handle.clone(),
                })
                .is_ok(),
            None => false,
        }
    }

    /// Drop every activation binding. Each bound entry holds a clone of the
    /// pipeline's activation sender, so this closes the activation channel and
    /// lets the pipeline drain to completion once in-flight chains finish.
    pub fn clear_bindings(&self) {
        self.lock().bindings.clear();
    }

    /// Every handle clicked so far, in order.
    pub fn clicks(&self) -> Vec<NodeHandle> {
        self.lock().clicks.clone()
    }

    /// How many times a handle for `selector` was clicked.
    pub fn click_count(&self, selector: &str) -> usize {
        let inner = self.lock();
        inner
            .clicks
            .iter()
            .filter(|handle| inner.origins.get(handle).map(String::as_str) == Some(selector))
            .count()
    }

    /// How many times `selector` has been queried.
    pub fn query_count(&self, selector: &str) -> u32 {
        self.lock().query_counts.get(selector).copied().unwrap_or(0)
    }
}

#[async_trait]
impl DomSurface for ScriptedSurface {
    async fn query(&self, selector: &str) -> Option<NodeHandle> {
        let mut inner = self.lock();
        let count = *inner
            .query_counts
            .entry(selector.to_string())
            .and_modify(|c| *c += 1)
            .or_insert(1);
        inner.nodes.get(selector).and_then(|entries| {
            entries
                .iter()
                .find(|e| e.visible_after <= count)
                .map(|e| e.handle.clone())
        })
    }

    async fn query_all(&self, selector: &str) -> Vec<NodeHandle> {
        let mut inner = self.lock();
        let count = *inner
            .query_counts
            .entry(selector.to_string())
            .and_modify(|c| *c += 1)
            .or_insert(1);
        inner
            .nodes
            .get(selector)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.visible_after <= count)
                    .map(|e| e.handle.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn text(&self, node: &NodeHandle) -> Option<String> {
        let inner = self.lock();
        let selector = inner.origins.get(node)?;
        inner
            .nodes
            .get(selector)?
            .iter()
            .find(|e| &e.handle == node)?
            .text
            .clone()
    }

    async fn click(&self, node: &NodeHandle) -> anyhow::Result<()> {
        let mut inner = self.lock();
        let Some(selector) = inner.origins.get(node).cloned() else {
            anyhow::bail!("click on stale handle {:?}", node);
        };
        inner.clicks.push(node.clone());
        let effects = inner.click_effects.get(&selector).cloned().unwrap_or_default();
        if effects.is_empty() {
            return Ok(());
        }
        for effect in effects {
            match effect {
                ClickEffect::Insert { selector, text } => {
                    inner.insert_node(&selector, text.as_deref(), 0);
                }
                ClickEffect::Remove { selector } => inner.remove_selector(&selector),
            }
        }
        inner.notify_watchers();
        Ok(())
    }

    async fn bind_activation(
        &self,
        node: &NodeHandle,
        events: mpsc::Sender<Activation>,
    ) -> anyhow::Result<()> {
        let mut inner = self.lock();
        if !inner.origins.contains_key(node) {
            anyhow::bail!("binding on stale handle {:?}", node);
        }
        inner.bindings.insert(node.clone(), events);
        Ok(())
    }

    fn mutations(&self) -> BoxStream<'static, Mutation> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().watchers.push(tx);
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}
