//! Bitbooth is the core of a retro photobooth: an ordered four-shot capture
//! workflow, per-photo decorative overlays, and a compositor that renders
//! the shots into one themed vertical strip.
//!
//! # Pipeline overview
//!
//! 1. **Session**: a pure state container tracking the selected theme, four
//!    photo slots, overlay lists, and the capture cursor.
//! 2. **Capture**: [`CaptureController`] drives a host-supplied
//!    [`CameraSource`], runs the countdown protocol, and turns one video
//!    frame into an immutable [`StillImage`].
//! 3. **Compose**: [`StripRenderer`] deterministically lays the stills,
//!    tints, overlays, labels, and branding footer onto a fixed canvas and
//!    encodes a PNG; [`StripWorker`] runs generations asynchronously and
//!    discards stale results.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Total state mutations**: session operations never panic for
//!   structurally valid input; out-of-range indices are logged no-ops.
//! - **No I/O in the renderer**: photos arrive as in-memory buffers and the
//!   strip leaves as one.
#![forbid(unsafe_code)]

pub mod capture;
pub mod compose;
pub mod foundation;
pub mod session;
pub mod theme;

pub use capture::controller::{CaptureController, DeviceState};
pub use capture::source::{CameraError, CameraFrame, CameraSource};
pub use compose::job::{StripTicket, StripUpdate, StripWorker};
pub use compose::strip::{
    BORDER_WIDTH, EncodedStrip, FOOTER_HEIGHT, PADDING, PHOTO_HEIGHT, STRIP_WIDTH, StripRenderer,
    WORDMARK, photo_rect, photo_width, strip_height,
};
pub use foundation::core::{Rgba, StillImage};
pub use foundation::error::{BoothError, BoothResult};
pub use foundation::rng::Rng64;
pub use session::model::{
    DEFAULT_OVERLAY_SIZE, Overlay, OverlayGlyph, SLOT_COUNT, Session,
};
pub use session::shared::{OverlayDrag, SharedSession};
pub use theme::catalog::{StripTexture, Theme, ThemeCatalog};
pub use theme::filter::{ColorFilter, ColorMatrix, FilterStep};
