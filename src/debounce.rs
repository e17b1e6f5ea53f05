use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::media::Message;

/// Quiet period the raw input stream must hold before a query settles.
pub const QUIESCENCE: Duration = Duration::from_millis(500);

/// Coalesces the raw input stream into settled queries. At most one timer
/// is pending; every new input aborts it and starts over, so only the last
/// value of a burst is ever emitted. Performs no I/O of its own.
pub struct SearchDebouncer {
    sender: UnboundedSender<Message>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    pub fn new(sender: UnboundedSender<Message>) -> Self {
        Self {
            sender,
            pending: None,
        }
    }

    pub fn input(&mut self, text: String) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        let sender = self.sender.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(QUIESCENCE).await;
            let _ = sender.send(Message::QuerySettled(text));
        }));
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
