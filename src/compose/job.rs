//! Async strip generation with stale-result discard.
//!
//! Generating a strip decodes four photos and encodes a tall PNG, so it runs
//! off the async threads. Each request gets a monotonically increasing
//! ticket; a result is committed to the watch channel only if its ticket is
//! still the most recent one, so a slow render finishing after the inputs
//! changed (or the screen was left) is dropped instead of applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::compose::strip::{EncodedStrip, StripRenderer};
use crate::foundation::core::StillImage;
use crate::session::model::{Overlay, SLOT_COUNT};
use crate::theme::catalog::Theme;

pub type StripTicket = u64;

/// Latest committed generation outcome. Failures carry the user-facing
/// message; the session's captured data is untouched either way, so the
/// caller can offer a retry without recapturing.
#[derive(Clone, Debug)]
pub struct StripUpdate {
    pub ticket: StripTicket,
    pub outcome: Result<EncodedStrip, String>,
}

#[derive(Clone)]
pub struct StripWorker {
    latest: Arc<AtomicU64>,
    results: Arc<watch::Sender<Option<StripUpdate>>>,
}

impl StripWorker {
    pub fn new() -> Self {
        let (results, _) = watch::channel(None);
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            results: Arc::new(results),
        }
    }

    /// Observe committed results. Stale generations never appear here.
    pub fn subscribe(&self) -> watch::Receiver<Option<StripUpdate>> {
        self.results.subscribe()
    }

    /// Queue a generation with a fresh renderer (entropy serial, current
    /// year). Must be called within a tokio runtime.
    pub fn submit(
        &self,
        photos: [Option<StillImage>; SLOT_COUNT],
        theme: Theme,
        overlays: [Vec<Overlay>; SLOT_COUNT],
    ) -> StripTicket {
        self.submit_with(StripRenderer::new(), photos, theme, overlays)
    }

    /// Queue a generation with a caller-configured renderer.
    pub fn submit_with(
        &self,
        mut renderer: StripRenderer,
        photos: [Option<StillImage>; SLOT_COUNT],
        theme: Theme,
        overlays: [Vec<Overlay>; SLOT_COUNT],
    ) -> StripTicket {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let worker = self.clone();
        tokio::spawn(async move {
            let joined = tokio::task::spawn_blocking(move || {
                renderer.generate(&photos, &theme, &overlays)
            })
            .await;
            let outcome = match joined {
                Ok(Ok(strip)) => Ok(strip),
                Ok(Err(err)) => Err(err.to_string()),
                Err(err) => Err(format!("strip generation task failed: {err}")),
            };
            worker.commit(ticket, outcome);
        });
        ticket
    }

    /// True while no newer request has been submitted.
    pub fn is_current(&self, ticket: StripTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    fn commit(&self, ticket: StripTicket, outcome: Result<EncodedStrip, String>) {
        if !self.is_current(ticket) {
            debug!(ticket, "discarding stale strip result");
            return;
        }
        self.results
            .send_replace(Some(StripUpdate { ticket, outcome }));
    }
}

impl Default for StripWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::strip::{STRIP_WIDTH, strip_height};
    use crate::theme::catalog::ThemeCatalog;

    fn empty_slots() -> [Option<StillImage>; SLOT_COUNT] {
        Default::default()
    }

    fn no_overlays() -> [Vec<Overlay>; SLOT_COUNT] {
        Default::default()
    }

    #[test]
    fn stale_tickets_are_not_committed() {
        let worker = StripWorker::new();
        worker.latest.store(2, Ordering::SeqCst);
        let mut rx = worker.subscribe();

        worker.commit(1, Err("old".into()));
        assert!(rx.borrow_and_update().is_none());

        worker.commit(2, Err("new".into()));
        let update = rx.borrow_and_update().clone().unwrap();
        assert_eq!(update.ticket, 2);
        assert_eq!(update.outcome.unwrap_err(), "new");
    }

    #[tokio::test]
    async fn submit_commits_the_latest_result() {
        let theme = ThemeCatalog::builtin().get("arcade").clone();
        let worker = StripWorker::new();
        let mut rx = worker.subscribe();

        let ticket = worker.submit_with(
            StripRenderer::with_seed(7).with_year(2026),
            empty_slots(),
            theme,
            no_overlays(),
        );

        rx.changed().await.unwrap();
        let update = rx.borrow_and_update().clone().unwrap();
        assert_eq!(update.ticket, ticket);
        let strip = update.outcome.unwrap();
        assert_eq!(strip.width, STRIP_WIDTH);
        assert_eq!(strip.height, strip_height());
    }

    #[tokio::test]
    async fn newer_submission_supersedes_older_ticket() {
        let theme = ThemeCatalog::builtin().get("crt").clone();
        let worker = StripWorker::new();
        let mut rx = worker.subscribe();

        let first = worker.submit_with(
            StripRenderer::with_seed(1).with_year(2026),
            empty_slots(),
            theme.clone(),
            no_overlays(),
        );
        let second = worker.submit_with(
            StripRenderer::with_seed(2).with_year(2026),
            empty_slots(),
            theme,
            no_overlays(),
        );
        assert!(second > first);
        assert!(!worker.is_current(first));

        // Wait until the newest ticket lands; the first may or may not have
        // committed before the second was submitted, but the final state is
        // always the newest.
        loop {
            rx.changed().await.unwrap();
            let latest = rx.borrow_and_update().clone().unwrap();
            if latest.ticket == second {
                break;
            }
            assert!(latest.ticket < second);
        }
    }
}
