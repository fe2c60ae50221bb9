// ABOUTME: Operator notification channel — a blocking acknowledgment primitive.
// ABOUTME: ConsoleNotifier waits for Enter on stdin; MemoryNotifier records for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Surfaces a result or diagnostic to the human operator.
///
/// `notify` blocks the calling chain until the operator acknowledges. Success
/// and failure notifications are not distinguished beyond message content.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> anyhow::Result<()>;
}

/// Notifier that prints to the console and waits for a newline on stdin.
///
/// Holds one stdin reader for its whole lifetime: bytes buffered past an
/// acknowledgment newline stay buffered for the next one.
pub struct ConsoleNotifier {
    auto_ack: bool,
    stdin: tokio::sync::Mutex<BufReader<Stdin>>,
}

impl ConsoleNotifier {
    /// `auto_ack` acknowledges immediately instead of waiting for Enter. Used
    /// by the replay driver for unattended runs.
    pub fn new(auto_ack: bool) -> Self {
        Self {
            auto_ack,
            stdin: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        println!("\n{message}");
        if self.auto_ack {
            return Ok(());
        }
        println!("(press Enter to continue)");
        let mut stdin = self.stdin.lock().await;
        read_ack(&mut *stdin).await?;
        Ok(())
    }
}

/// Read one acknowledgment line from the shared reader.
async fn read_ack<R: AsyncBufRead + Unpin>(reader: &mut R) -> anyhow::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    Ok(line)
}

/// Notifier that records messages and acknowledges immediately, for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message notified so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push(message.to_string());
        Ok(())
    }
}
