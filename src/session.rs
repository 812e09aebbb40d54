//! Per-session chat worker.
//!
//! Every submission goes through a FIFO queue owned by a single task, so a
//! user message and its delayed reply are always adjacent in the history.
//! The delay is raced against the session's cancellation token; tearing the
//! session down stops the timer and the worker together.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::conversation::{Conversation, Message};
use crate::error::{AppError, AppResult};
use crate::responder;

/// Exchanges a session may have waiting before submissions are refused.
pub const MAX_QUEUED: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyState {
    Idle,
    Responding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatStatus {
    pub state: ReplyState,
    pub queued: usize,
}

pub struct ChatSession {
    conversation: Arc<RwLock<Conversation>>,
    responding: Arc<AtomicBool>,
    queued: Arc<AtomicUsize>,
    tx: mpsc::Sender<String>,
    cancel: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ChatSession {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn(conversation: Conversation, delay: Duration) -> Self {
        let conversation = Arc::new(RwLock::new(conversation));
        let responding = Arc::new(AtomicBool::new(false));
        let queued = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(MAX_QUEUED);

        let worker = tokio::spawn(run_worker(
            rx,
            Arc::clone(&conversation),
            Arc::clone(&responding),
            Arc::clone(&queued),
            delay,
            cancel.clone(),
        ));

        ChatSession {
            conversation,
            responding,
            queued,
            tx,
            cancel,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queues `text` for a reply and returns how many exchanges are waiting,
    /// this one included.
    pub fn submit(&self, text: &str) -> AppResult<usize> {
        if text.trim().is_empty() {
            return Err(AppError::EmptyMessage);
        }
        if self.cancel.is_cancelled() {
            return Err(AppError::SessionClosed);
        }
        let position = self.queued.fetch_add(1, Ordering::SeqCst) + 1;
        match self.tx.try_send(text.to_string()) {
            Ok(()) => Ok(position),
            Err(e) => {
                self.queued.fetch_sub(1, Ordering::SeqCst);
                Err(match e {
                    TrySendError::Full(_) => AppError::QueueFull,
                    TrySendError::Closed(_) => AppError::SessionClosed,
                })
            }
        }
    }

    pub async fn snapshot(&self) -> Vec<Message> {
        self.conversation.read().await.messages().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.conversation.read().await.len()
    }

    pub fn status(&self) -> ChatStatus {
        let state = if self.responding.load(Ordering::SeqCst) {
            ReplyState::Responding
        } else {
            ReplyState::Idle
        };
        ChatStatus {
            state,
            queued: self.queued.load(Ordering::SeqCst),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels any pending reply and waits for the worker to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "chat worker ended abnormally");
            }
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<String>,
    conversation: Arc<RwLock<Conversation>>,
    responding: Arc<AtomicBool>,
    queued: Arc<AtomicUsize>,
    delay: Duration,
    cancel: CancellationToken,
) {
    loop {
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = rx.recv() => match next {
                Some(text) => text,
                None => break,
            },
        };

        responding.store(true, Ordering::SeqCst);
        queued.fetch_sub(1, Ordering::SeqCst);
        conversation.write().await.push(Message::user(text.clone()));

        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("pending reply cancelled");
                break;
            }
            _ = tokio::time::sleep(delay) => responder::classify(&text),
        };

        tracing::info!(intent = ?reply.intent, "reply ready");
        // Flag is cleared under the write lock: a snapshot holding the reply
        // never pairs with a Responding status.
        let mut history = conversation.write().await;
        history.push(Message::bot(reply));
        responding.store(false, Ordering::SeqCst);
    }
    rx.close();
    responding.store(false, Ordering::SeqCst);
    queued.store(0, Ordering::SeqCst);
}
