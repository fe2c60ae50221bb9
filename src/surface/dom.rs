// ABOUTME: DomSurface capability trait — the only boundary to the host document tree.
// ABOUTME: Structural queries, text reads, simulated clicks, and mutation subscriptions.

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::mpsc;

/// Opaque handle to an element, minted by a surface implementation.
///
/// Handles may go stale when the host UI re-renders; surface methods report
/// staleness as absence (`None`) rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub String);

/// A push notification that the watched subtree's structure changed.
///
/// Carries no payload: consumers re-query the surface for whatever structural
/// marker they are waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation;

/// One operator click on a bound conversation entry.
#[derive(Debug, Clone)]
pub struct Activation {
    pub entry: NodeHandle,
}

/// Injected capability over the host application's document tree.
///
/// Selector strings are configuration data (see `SelectorProfile`); nothing
/// above this trait knows what the host UI's markup looks like.
#[async_trait]
pub trait DomSurface: Send + Sync {
    /// First element matching the selector, if any.
    async fn query(&self, selector: &str) -> Option<NodeHandle>;

    /// All elements matching the selector, in document order.
    async fn query_all(&self, selector: &str) -> Vec<NodeHandle>;

    /// Rendered text of an element. `None` when the handle is stale or the
    /// element carries no text.
    async fn text(&self, node: &NodeHandle) -> Option<String>;

    /// Simulate an activation (click) on an element.
    async fn click(&self, node: &NodeHandle) -> anyhow::Result<()>;

    /// Deliver one `Activation` on `events` each time the operator clicks `node`.
    async fn bind_activation(
        &self,
        node: &NodeHandle,
        events: mpsc::Sender<Activation>,
    ) -> anyhow::Result<()>;

    /// Subscribe to structural-change notifications for the watched subtree.
    /// Dropping the stream unsubscribes.
    fn mutations(&self) -> BoxStream<'static, Mutation>;
}
