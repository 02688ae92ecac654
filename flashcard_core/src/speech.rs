//! Boundary to the speech-to-text collaborator
//!
//! A recognizer hands back exactly one finalized transcript per listen through
//! a single-use channel. The game side owns the [`PendingTranscript`]; dropping
//! or cancelling it tells the recognizer nobody is waiting any more.

use tokio::sync::oneshot;

use crate::error::Result;

/// Recognizer half: resolves the listen with the final transcript
#[derive(Debug)]
pub struct TranscriptSender {
    tx: oneshot::Sender<String>,
}

impl TranscriptSender {
    /// Deliver the final transcript. Returns `false` if the listener is gone.
    pub fn finalize(self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }

    /// True once the waiting side cancelled or was dropped
    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Game half: awaits the final transcript
#[derive(Debug)]
pub struct PendingTranscript {
    rx: oneshot::Receiver<String>,
}

impl PendingTranscript {
    /// `None` when the recognizer stopped without a final result
    pub async fn finalized(self) -> Option<String> {
        self.rx.await.ok()
    }

    /// Stop waiting; a later `finalize` on the sender returns `false`.
    pub fn cancel(mut self) {
        self.rx.close();
    }
}

pub fn transcript_channel() -> (TranscriptSender, PendingTranscript) {
    let (tx, rx) = oneshot::channel();
    (TranscriptSender { tx }, PendingTranscript { rx })
}

/// A speech recognizer owned by whoever runs the game loop
pub trait TranscriptionSource {
    /// Begin capturing; the returned handle resolves with the final transcript.
    fn start_listening(&mut self) -> Result<PendingTranscript>;

    /// Stop capturing. Called after every listen, whether or not it resolved.
    fn stop_listening(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finalize_resolves_once() {
        let (tx, pending) = transcript_channel();
        assert!(!tx.is_cancelled());
        assert!(tx.finalize("elephant"));
        assert_eq!(pending.finalized().await.as_deref(), Some("elephant"));
    }

    #[tokio::test]
    async fn test_dropped_sender_yields_none() {
        let (tx, pending) = transcript_channel();
        drop(tx);
        assert_eq!(pending.finalized().await, None);
    }

    #[test]
    fn test_cancel_reaches_sender() {
        let (tx, pending) = transcript_channel();
        pending.cancel();
        assert!(tx.is_cancelled());
        assert!(!tx.finalize("too late"));
    }
}
