//! Capture controller behavior against a scripted camera source: device
//! lifecycle, countdown protocol, mid-countdown cancellation, mirroring, and
//! capture-time filtering.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bitbooth::{
    CameraError, CameraFrame, CameraSource, CaptureController, ColorFilter, DeviceState,
    FilterStep,
};

const TICK: Duration = Duration::from_millis(40);

#[derive(Clone, Default)]
struct Counters {
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl Counters {
    fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

enum OpenBehavior {
    Succeed,
    Deny,
    Missing,
}

struct FakeCamera {
    behavior: OpenBehavior,
    frame: Option<CameraFrame>,
    counters: Counters,
    open: bool,
}

impl FakeCamera {
    fn live(frame: Option<CameraFrame>, counters: Counters) -> Box<Self> {
        Box::new(Self {
            behavior: OpenBehavior::Succeed,
            frame,
            counters,
            open: false,
        })
    }

    fn failing(behavior: OpenBehavior) -> Box<Self> {
        Box::new(Self {
            behavior,
            frame: None,
            counters: Counters::default(),
            open: false,
        })
    }
}

impl CameraSource for FakeCamera {
    fn open(&mut self) -> Result<(), CameraError> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            OpenBehavior::Succeed => {
                self.open = true;
                Ok(())
            }
            OpenBehavior::Deny => Err(CameraError::PermissionDenied),
            OpenBehavior::Missing => Err(CameraError::Unavailable("no camera found".into())),
        }
    }

    fn frame(&self) -> Option<CameraFrame> {
        if self.open { self.frame.clone() } else { None }
    }

    fn close(&mut self) {
        if self.open {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            self.open = false;
        }
    }
}

/// 2x1 frame: red pixel on the left, blue pixel on the right.
fn two_pixel_frame() -> CameraFrame {
    CameraFrame {
        width: 2,
        height: 1,
        rgba8: vec![255, 0, 0, 255, 0, 0, 255, 255],
    }
}

#[tokio::test]
async fn capture_before_start_resolves_to_no_image() {
    let controller = CaptureController::new(FakeCamera::live(
        Some(two_pixel_frame()),
        Counters::default(),
    ));
    assert_eq!(controller.state(), DeviceState::Stopped);
    let result = controller.capture(0).await.unwrap();
    assert!(result.is_none());
}

#[test]
fn denied_access_is_reported_and_remembered() {
    let controller = CaptureController::new(FakeCamera::failing(OpenBehavior::Deny));
    let err = controller.start().unwrap_err();
    assert_eq!(err, CameraError::PermissionDenied);
    assert!(err.to_string().contains("denied"));
    assert_eq!(controller.state(), DeviceState::Error(CameraError::PermissionDenied));
}

#[test]
fn missing_device_is_distinguished_from_denial() {
    let controller = CaptureController::new(FakeCamera::failing(OpenBehavior::Missing));
    let err = controller.start().unwrap_err();
    assert!(matches!(err, CameraError::Unavailable(_)));
    assert!(err.to_string().contains("could not access camera"));
}

#[test]
fn restart_releases_the_previous_handle_first() {
    let counters = Counters::default();
    let controller =
        CaptureController::new(FakeCamera::live(Some(two_pixel_frame()), counters.clone()));
    controller.start().unwrap();
    controller.start().unwrap();
    assert_eq!(controller.state(), DeviceState::Live);
    assert_eq!(counters.opens(), 2);
    assert_eq!(counters.closes(), 1);
}

#[test]
fn dropping_the_controller_releases_the_device() {
    let counters = Counters::default();
    let controller =
        CaptureController::new(FakeCamera::live(Some(two_pixel_frame()), counters.clone()));
    controller.start().unwrap();
    drop(controller);
    assert_eq!(counters.closes(), 1);
}

#[tokio::test]
async fn immediate_capture_mirrors_the_frame() {
    let controller = CaptureController::new(FakeCamera::live(
        Some(two_pixel_frame()),
        Counters::default(),
    ));
    controller.start().unwrap();

    let still = controller.capture(0).await.unwrap().expect("still image");
    assert_eq!((still.width(), still.height()), (2, 1));
    let (_, _, px) = still.decode_rgba8().unwrap();
    // Left pixel is now the blue one.
    assert_eq!(&px[..4], &[0, 0, 255, 255]);
    assert_eq!(&px[4..], &[255, 0, 0, 255]);
}

#[tokio::test]
async fn capture_without_an_available_frame_yields_none() {
    let controller = CaptureController::new(FakeCamera::live(None, Counters::default()));
    controller.start().unwrap();
    assert!(controller.capture(0).await.unwrap().is_none());
}

#[tokio::test]
async fn countdown_emits_each_second_then_produces_a_still() {
    let controller = Arc::new(
        CaptureController::new(FakeCamera::live(
            Some(two_pixel_frame()),
            Counters::default(),
        ))
        .with_tick(TICK),
    );
    controller.start().unwrap();

    let mut rx = controller.countdown();
    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.capture(3).await }
    });

    let mut seen = Vec::new();
    loop {
        rx.changed().await.unwrap();
        let v = *rx.borrow_and_update();
        seen.push(v);
        if v.is_none() {
            break;
        }
    }

    let still = task.await.unwrap().unwrap();
    assert!(still.is_some());
    assert_eq!(seen, vec![Some(3), Some(2), Some(1), None]);
}

#[tokio::test]
async fn stopping_mid_countdown_cancels_the_capture() {
    let counters = Counters::default();
    let controller = Arc::new(
        CaptureController::new(FakeCamera::live(Some(two_pixel_frame()), counters.clone()))
            .with_tick(TICK),
    );
    controller.start().unwrap();

    let task = tokio::spawn({
        let controller = controller.clone();
        async move { controller.capture(5).await }
    });

    // Let a couple of ticks elapse, then tear the device down.
    tokio::time::sleep(TICK * 2).await;
    controller.stop();

    let result = task.await.unwrap().unwrap();
    assert!(result.is_none(), "cancelled countdown must not produce a still");
    assert_eq!(controller.state(), DeviceState::Stopped);
    assert_eq!(*controller.countdown().borrow(), None);
    assert_eq!(counters.closes(), 1);
}

#[tokio::test]
async fn capture_applies_the_configured_theme_filter() {
    let controller = CaptureController::new(FakeCamera::live(
        Some(two_pixel_frame()),
        Counters::default(),
    ));
    controller.set_filter(Some(ColorFilter::new(vec![FilterStep::Grayscale(1.0)])));
    controller.start().unwrap();

    let still = controller.capture(0).await.unwrap().expect("still image");
    let (_, _, px) = still.decode_rgba8().unwrap();
    for pixel in px.chunks_exact(4) {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
        assert_eq!(pixel[3], 255);
    }
}
