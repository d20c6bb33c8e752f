//! Camera capability boundary.
//!
//! The core never talks to camera hardware directly. A host supplies a
//! [`CameraSource`]: something that can be opened (possibly after a
//! permission prompt), yields the latest preview frame on demand, and is
//! closed to release the device handle.

/// One video frame as straight-alpha RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

/// Device-access failures, distinguished so the UI can word them usefully.
/// These are surfaced with a retry affordance and never retried
/// automatically.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera access denied; allow camera permissions and try again")]
    PermissionDenied,

    #[error("could not access camera: {0}")]
    Unavailable(String),
}

/// A live camera device as seen by the capture controller.
///
/// Implementations own the underlying device handle. `open` on an already
/// open source must not leak the prior handle; the controller additionally
/// closes before re-opening so a conforming implementation never holds two.
pub trait CameraSource: Send {
    /// Request device access. May block on a user permission prompt.
    fn open(&mut self) -> Result<(), CameraError>;

    /// Snapshot of the most recent preview frame, or `None` if no frame is
    /// available yet.
    fn frame(&self) -> Option<CameraFrame>;

    /// Release the device handle. Idempotent.
    fn close(&mut self);
}
