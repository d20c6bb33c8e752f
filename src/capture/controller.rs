//! Capture controller: device lifecycle plus the countdown-then-capture
//! protocol.
//!
//! Device lifecycle (Stopped / Live / Error) is separate from per-capture
//! state. A capture request with a timer counts down one tick at a time,
//! publishing the remaining seconds on a watch channel for display; stopping
//! the device mid-countdown aborts the capture without producing an image.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::capture::source::{CameraError, CameraFrame, CameraSource};
use crate::foundation::core::StillImage;
use crate::foundation::error::{BoothError, BoothResult};
use crate::theme::filter::ColorFilter;

/// Device lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceState {
    Stopped,
    Live,
    Error(CameraError),
}

struct Inner {
    source: Box<dyn CameraSource>,
    state: DeviceState,
    /// Applied to frames at capture time, usually the selected theme's
    /// filter so the saved still matches the preview.
    filter: Option<ColorFilter>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Release the device on every exit path.
        self.source.close();
    }
}

pub struct CaptureController {
    inner: Arc<Mutex<Inner>>,
    countdown: watch::Sender<Option<u32>>,
    tick: Duration,
}

impl CaptureController {
    pub fn new(source: Box<dyn CameraSource>) -> Self {
        let (countdown, _) = watch::channel(None);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                source,
                state: DeviceState::Stopped,
                filter: None,
            })),
            countdown,
            tick: Duration::from_secs(1),
        }
    }

    /// Override the countdown tick length (default one second).
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Set or clear the capture-time color filter.
    pub fn set_filter(&self, filter: Option<ColorFilter>) {
        self.lock().filter = filter;
    }

    pub fn state(&self) -> DeviceState {
        self.lock().state.clone()
    }

    pub fn is_live(&self) -> bool {
        matches!(self.lock().state, DeviceState::Live)
    }

    /// Subscribe to countdown updates: `Some(k)` while counting, `None`
    /// otherwise.
    pub fn countdown(&self) -> watch::Receiver<Option<u32>> {
        self.countdown.subscribe()
    }

    /// Acquire the device and go Live. Starting while already Live releases
    /// the held handle first, so a duplicate start never leaks a device.
    /// Failures move the controller to the Error state and are not retried
    /// here; retry is a caller-initiated repeat of `start`.
    pub fn start(&self) -> Result<(), CameraError> {
        let mut inner = self.lock();
        if inner.state == DeviceState::Live {
            debug!("start requested while live, releasing current handle");
            inner.source.close();
            inner.state = DeviceState::Stopped;
        }
        match inner.source.open() {
            Ok(()) => {
                info!("camera live");
                inner.state = DeviceState::Live;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "camera start failed");
                inner.state = DeviceState::Error(err.clone());
                Err(err)
            }
        }
    }

    /// Release the device and return to Stopped. Also clears any countdown
    /// in flight, which aborts a pending capture.
    pub fn stop(&self) {
        {
            let mut inner = self.lock();
            if inner.state != DeviceState::Stopped {
                inner.source.close();
            }
            inner.state = DeviceState::Stopped;
        }
        self.countdown.send_replace(None);
        info!("camera stopped");
    }

    /// Run the capture protocol: count down `timer_seconds` ticks, then grab
    /// the current frame, mirror it (selfie convention), apply the capture
    /// filter, and encode a PNG still.
    ///
    /// Resolves to `Ok(None)` without error when the device is not live, no
    /// frame is available, or the device is stopped mid-countdown.
    pub async fn capture(&self, timer_seconds: u32) -> BoothResult<Option<StillImage>> {
        if !self.is_live() {
            debug!("capture requested while device not live");
            return Ok(None);
        }

        for k in (1..=timer_seconds).rev() {
            self.countdown.send_replace(Some(k));
            tokio::time::sleep(self.tick).await;
            if !self.is_live() {
                debug!("countdown aborted, device no longer live");
                self.countdown.send_replace(None);
                return Ok(None);
            }
        }

        let grabbed = {
            let inner = self.lock();
            match inner.state {
                DeviceState::Live => inner.source.frame().map(|f| (f, inner.filter.clone())),
                _ => None,
            }
        };
        let Some((mut frame, filter)) = grabbed else {
            self.countdown.send_replace(None);
            return Ok(None);
        };

        mirror_horizontal(&mut frame);
        if let Some(filter) = filter {
            filter.apply_rgba8(&mut frame.rgba8);
        }

        let still = tokio::task::spawn_blocking(move || {
            StillImage::from_rgba8(frame.width, frame.height, &frame.rgba8)
        })
        .await
        .map_err(|e| BoothError::capture(format!("still encode task failed: {e}")))??;

        self.countdown.send_replace(None);
        debug!(
            width = still.width(),
            height = still.height(),
            "still captured"
        );
        Ok(Some(still))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("capture controller mutex poisoned")
    }
}

/// Flip a frame left-to-right so the saved still matches what the user sees
/// in a mirrored preview.
fn mirror_horizontal(frame: &mut CameraFrame) {
    let w = frame.width as usize;
    for row in frame.rgba8.chunks_exact_mut(w * 4) {
        for x in 0..w / 2 {
            let left = x * 4;
            let right = (w - 1 - x) * 4;
            for i in 0..4 {
                row.swap(left + i, right + i);
            }
        }
    }
}
