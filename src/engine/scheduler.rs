//! Typing-delay timer.
//!
//! One worker task per session pulls scheduled replies off a queue and
//! sleeps until each deadline before handing the reply back. Deadlines are
//! chained, so replies land in scheduling order and their typing intervals
//! never overlap.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::{PendingReply, SessionEvent};

struct Scheduled {
    deadline: Instant,
    reply: PendingReply,
}

/// Handle to the reply worker. Dropping it cancels every pending reply.
pub struct ReplyScheduler {
    delay: Duration,
    queue_tx: mpsc::UnboundedSender<Scheduled>,
    last_deadline: Option<Instant>,
    worker: JoinHandle<()>,
}

impl ReplyScheduler {
    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn start(delay: Duration, events_tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(reply_loop(queue_rx, events_tx));

        Self {
            delay,
            queue_tx,
            last_deadline: None,
            worker,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue a reply; returns when it will be delivered.
    pub fn schedule(&mut self, reply: PendingReply) -> Instant {
        let now = Instant::now();
        let start = match self.last_deadline {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        let deadline = start + self.delay;
        self.last_deadline = Some(deadline);

        tracing::debug!(seq = reply.seq, "reply scheduled");
        if self
            .queue_tx
            .send(Scheduled { deadline, reply })
            .is_err()
        {
            tracing::error!("Reply worker stopped -- reply dropped");
        }
        deadline
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn reply_loop(
    mut queue_rx: mpsc::UnboundedReceiver<Scheduled>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
) {
    while let Some(Scheduled { deadline, reply }) = queue_rx.recv().await {
        time::sleep_until(deadline).await;
        if events_tx.send(SessionEvent::ReplyReady(reply)).is_err() {
            // Session is gone.
            break;
        }
    }
}
