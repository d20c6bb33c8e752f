//! Shared, observable session handle for view layers.
//!
//! The session itself is single-writer; this wrapper serializes access
//! behind a mutex and bumps a revision counter on every mutation so a view
//! can subscribe to "something changed" without polling. Overlay dragging
//! is a scoped interaction: [`OverlayDrag`] pins the addressed overlay for
//! the duration of the gesture and ends on drop, whatever path the gesture
//! takes out.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

use crate::session::model::Session;

#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
    revision: Arc<watch::Sender<u64>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(session)),
            revision: Arc::new(tx),
        }
    }

    /// Read the current state through a closure.
    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let guard = self.inner.lock().expect("session mutex poisoned");
        f(&guard)
    }

    /// Mutate the state through a closure and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard = self.inner.lock().expect("session mutex poisoned");
        let out = f(&mut guard);
        drop(guard);
        self.revision.send_modify(|rev| *rev += 1);
        out
    }

    /// Subscribe to revision bumps. The receiver's value is a monotonically
    /// increasing counter, not a snapshot; read state via [`Self::read`].
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Begin dragging one overlay. Returns `None` when the addressed
    /// overlay does not exist. The returned guard is the interaction scope:
    /// stream pointer positions into [`OverlayDrag::move_to`] and drop it to
    /// end the drag.
    pub fn begin_overlay_drag(&self, slot: usize, overlay: usize) -> Option<OverlayDrag> {
        let exists = self.read(|s| overlay < s.overlays(slot).len());
        if !exists {
            debug!(slot, overlay, "drag requested for a missing overlay");
            return None;
        }
        debug!(slot, overlay, "overlay drag started");
        Some(OverlayDrag {
            shared: self.clone(),
            slot,
            overlay,
        })
    }
}

/// A live drag gesture on one overlay. Every position update is clamped by
/// the session; dropping the guard ends the gesture on any exit path.
pub struct OverlayDrag {
    shared: SharedSession,
    slot: usize,
    overlay: usize,
}

impl OverlayDrag {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn overlay(&self) -> usize {
        self.overlay
    }

    /// Apply one pointer move, in normalized photo coordinates.
    pub fn move_to(&self, x: f64, y: f64) {
        self.shared
            .update(|s| s.move_overlay(self.slot, self.overlay, x, y));
    }
}

impl Drop for OverlayDrag {
    fn drop(&mut self) {
        debug!(slot = self.slot, overlay = self.overlay, "overlay drag ended");
    }
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new(Session::new())
    }
}
