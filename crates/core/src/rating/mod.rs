//! Outfit critique from an external style-rating service.
//!
//! Requests leave the frame loop on a worker thread and come back through a
//! channel the pipeline polls, so a slow or failing service never stalls a
//! frame.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
};

use tracing::{info, warn};

use crate::{MirrorError, Result};

/// Shown whenever the rating service fails.
pub const FALLBACK_CRITIQUE: &str =
    "The mirror is lost for words. Trust your own style today!";

pub trait StyleRater: Send + Sync + 'static {
    fn rate(&self, image: &[u8]) -> Result<String>;
}

/// Offline rater with a fixed set of critiques, picked from the snapshot
/// bytes so the same image always gets the same verdict.
#[derive(Debug, Clone, Default)]
pub struct CannedRater;

const CANNED_CRITIQUES: [&str; 4] = [
    "Bold choice! The accessories are doing a lot of heavy lifting, and it works.",
    "Classic and confident. Maybe one more hat would push it over the top?",
    "A fearless mix. The mirror approves of this chaos.",
    "Understated elegance. Try a face filter for extra drama.",
];

impl StyleRater for CannedRater {
    fn rate(&self, image: &[u8]) -> Result<String> {
        if image.is_empty() {
            return Err(MirrorError::InvalidInput("empty snapshot"));
        }
        let digest = image
            .iter()
            .fold(0usize, |acc, byte| acc.wrapping_mul(31).wrapping_add(*byte as usize));
        Ok(CANNED_CRITIQUES[digest % CANNED_CRITIQUES.len()].to_string())
    }
}

/// Fire-and-forget front end for a [`StyleRater`].
pub struct StyleAdvisor {
    rater: Arc<dyn StyleRater>,
    tx: Sender<String>,
    rx: Receiver<String>,
    pending: usize,
}

impl StyleAdvisor {
    pub fn new(rater: impl StyleRater) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rater: Arc::new(rater),
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Starts a rating in the background. Only failing to start the worker
    /// is reported; rating failures arrive later as the fallback critique.
    pub fn request(&mut self, image: Vec<u8>) -> Result<()> {
        let rater = Arc::clone(&self.rater);
        let tx = self.tx.clone();
        thread::Builder::new()
            .name("style-rater".into())
            .spawn(move || {
                let critique = match panic::catch_unwind(AssertUnwindSafe(|| rater.rate(&image))) {
                    Ok(Ok(critique)) => critique,
                    Ok(Err(err)) => {
                        warn!(%err, "style rating failed");
                        FALLBACK_CRITIQUE.to_string()
                    }
                    Err(_) => {
                        warn!("style rater panicked");
                        FALLBACK_CRITIQUE.to_string()
                    }
                };
                let _ = tx.send(critique);
            })?;
        self.pending += 1;
        info!(pending = self.pending, "style rating requested");
        Ok(())
    }

    /// Returns a finished critique without blocking.
    pub fn poll(&mut self) -> Option<String> {
        let critique = self.rx.try_recv().ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(critique)
    }
}

impl std::fmt::Debug for StyleAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleAdvisor")
            .field("pending", &self.pending)
            .finish()
    }
}
