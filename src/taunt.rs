//! Narrative text boundary
//!
//! Boss taunts come from an external text-generation collaborator. The
//! engine fires [`TauntRequest`]s without waiting and later reads whatever
//! line has been delivered into the mailbox; it never blocks, retries, or
//! cancels. When the provider is absent or answers with an empty string,
//! the request's fallback line is substituted.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

/// A fire-and-forget request for one taunt line.
///
/// `context` is a short English description of the current battle moment,
/// handed opaquely to the provider. `fallback` is the fixed line substituted
/// when no usable response arrives; each call site picks its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TauntRequest {
    pub context: &'static str,
    pub fallback: &'static str,
}

impl TauntRequest {
    /// The battle contexts read fine as lines themselves, so each call site
    /// falls back to its own context string.
    pub(crate) const fn from_context(context: &'static str) -> Self {
        Self { context, fallback: context }
    }
}

/// Non-blocking delivery slot for provider responses.
///
/// The provider side takes a [`Sender`] clone and delivers lines from
/// wherever it likes - another thread, an async task, a test. The engine
/// drains at most one line per poll.
#[derive(Debug)]
pub struct TauntMailbox {
    tx: Sender<String>,
    rx: Receiver<String>,
    /// Fallback for the most recent outstanding request.
    pending_fallback: Option<&'static str>,
}

impl TauntMailbox {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx, pending_fallback: None }
    }

    /// Handle for the provider side.
    pub fn sender(&self) -> Sender<String> {
        self.tx.clone()
    }

    /// Record an outstanding request so an empty delivery can be substituted.
    pub(crate) fn note_request(&mut self, request: &TauntRequest) {
        self.pending_fallback = Some(request.fallback);
    }

    /// Poll for a delivered line without blocking.
    ///
    /// An empty or whitespace-only delivery yields the pending request's
    /// fallback; no delivery yields `None` and the caller keeps whatever
    /// line it already shows.
    pub fn poll(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => {
                let line = line.trim().to_owned();
                let fallback = self.pending_fallback.take();
                if line.is_empty() {
                    fallback.map(str::to_owned)
                } else {
                    Some(line)
                }
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Default for TauntMailbox {
    fn default() -> Self {
        Self::new()
    }
}
