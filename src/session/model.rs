//! The session aggregate: selected theme, four photo slots, per-slot overlay
//! lists, and the capture cursor.
//!
//! The session is a pure state container. Mutations are synchronous and
//! total: structurally invalid indices are a logged no-op, never a panic,
//! since call sites derive indices from current state. No I/O happens here.

use tracing::debug;

use crate::foundation::core::{Rgba, StillImage};
use crate::foundation::rng::Rng64;

/// Number of photo slots in a strip.
pub const SLOT_COUNT: usize = 4;

/// Default overlay size as a fraction of photo width.
pub const DEFAULT_OVERLAY_SIZE: f64 = 0.1;

/// Decorative glyph identifiers available as overlays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OverlayGlyph {
    Star,
    Heart,
    Bolt,
    Gamepad,
    Badge,
    Fire,
    Sparkle,
    Diamond,
    Rocket,
}

/// A decorative sticker placed on one photo slot.
///
/// `x`/`y` are fractions of the photo rectangle in `[0, 1]` with origin
/// top-left; `size` is a fraction of the photo width. The glyph is drawn
/// center-anchored on `(x, y)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Overlay {
    pub glyph: OverlayGlyph,
    pub color: Rgba,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// A single photobooth session.
#[derive(Clone, Debug)]
pub struct Session {
    theme: Option<String>,
    photos: [Option<StillImage>; SLOT_COUNT],
    overlays: [Vec<Overlay>; SLOT_COUNT],
    cursor: usize,
    rng: Rng64,
}

impl Session {
    pub fn new() -> Self {
        Self::with_seed_rng(Rng64::from_entropy())
    }

    /// Deterministic overlay placement for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_seed_rng(Rng64::new(seed))
    }

    fn with_seed_rng(rng: Rng64) -> Self {
        Self {
            theme: None,
            photos: Default::default(),
            overlays: Default::default(),
            cursor: 0,
            rng,
        }
    }

    /// Set the theme key. Existing photos and overlays are kept; switching
    /// theme mid-session only changes how they are previewed and rendered.
    pub fn select_theme(&mut self, key: impl Into<String>) {
        self.theme = Some(key.into());
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    /// Store a capture in the slot at the cursor and advance. No-op when the
    /// session is already complete; callers gate capture on `is_complete`.
    pub fn record_capture(&mut self, image: StillImage) {
        if self.cursor >= SLOT_COUNT {
            debug!("capture recorded on a complete session, ignoring");
            return;
        }
        self.photos[self.cursor] = Some(image);
        self.cursor = (self.cursor + 1).min(SLOT_COUNT);
    }

    /// Empty a slot for retake and point the cursor at it. The slot's
    /// overlay list is deliberately left in place so sticker placements
    /// survive a retake.
    pub fn clear_slot(&mut self, index: usize) {
        if index >= SLOT_COUNT {
            debug!(index, "clear_slot out of range, ignoring");
            return;
        }
        self.photos[index] = None;
        self.cursor = index;
    }

    /// Append an overlay to a slot. Position is pseudo-random in
    /// `[0.2, 0.8]` on both axes so fresh stickers land away from the edges.
    pub fn add_overlay(&mut self, slot: usize, glyph: OverlayGlyph, color: Rgba) {
        if slot >= SLOT_COUNT {
            debug!(slot, "add_overlay out of range, ignoring");
            return;
        }
        let x = self.rng.next_f64_in(0.2, 0.8);
        let y = self.rng.next_f64_in(0.2, 0.8);
        self.overlays[slot].push(Overlay {
            glyph,
            color,
            x,
            y,
            size: DEFAULT_OVERLAY_SIZE,
        });
    }

    /// Reposition an overlay, clamping both axes to `[0, 1]`.
    pub fn move_overlay(&mut self, slot: usize, overlay: usize, x: f64, y: f64) {
        let Some(target) = self
            .overlays
            .get_mut(slot)
            .and_then(|list| list.get_mut(overlay))
        else {
            debug!(slot, overlay, "move_overlay out of range, ignoring");
            return;
        };
        target.x = x.clamp(0.0, 1.0);
        target.y = y.clamp(0.0, 1.0);
    }

    /// Remove an overlay by index; later overlays shift down.
    pub fn remove_overlay(&mut self, slot: usize, overlay: usize) {
        let Some(list) = self.overlays.get_mut(slot) else {
            debug!(slot, "remove_overlay out of range, ignoring");
            return;
        };
        if overlay < list.len() {
            list.remove(overlay);
        } else {
            debug!(slot, overlay, "remove_overlay out of range, ignoring");
        }
    }

    /// Remove the most recently added overlay of a slot (LIFO undo).
    pub fn undo_last_overlay(&mut self, slot: usize) {
        let Some(list) = self.overlays.get_mut(slot) else {
            debug!(slot, "undo_last_overlay out of range, ignoring");
            return;
        };
        list.pop();
    }

    /// Drop every overlay of one slot.
    pub fn clear_overlays(&mut self, slot: usize) {
        let Some(list) = self.overlays.get_mut(slot) else {
            debug!(slot, "clear_overlays out of range, ignoring");
            return;
        };
        list.clear();
    }

    /// Back to the initial empty state: theme unset, all slots empty,
    /// cursor at 0.
    pub fn reset(&mut self) {
        self.theme = None;
        self.photos = Default::default();
        self.overlays = Default::default();
        self.cursor = 0;
    }

    pub fn photo(&self, slot: usize) -> Option<&StillImage> {
        self.photos.get(slot).and_then(|p| p.as_ref())
    }

    pub fn photos(&self) -> &[Option<StillImage>; SLOT_COUNT] {
        &self.photos
    }

    pub fn overlays(&self, slot: usize) -> &[Overlay] {
        self.overlays.get(slot).map_or(&[], Vec::as_slice)
    }

    pub fn overlay_lists(&self) -> &[Vec<Overlay>; SLOT_COUNT] {
        &self.overlays
    }

    /// Index of the next slot to fill; `SLOT_COUNT` once complete.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn captured_count(&self) -> usize {
        self.photos.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.captured_count() == SLOT_COUNT
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
