//! Session state machine properties: cursor movement, retake isolation,
//! overlay clamping and LIFO undo, reset idempotence.

use bitbooth::{OverlayGlyph, Rgba, Session, SLOT_COUNT, StillImage};

fn still(shade: u8) -> StillImage {
    StillImage::from_rgba8(2, 2, &[shade, 0, 0, 255].repeat(4)).unwrap()
}

#[test]
fn cursor_and_count_track_successful_captures() {
    let mut s = Session::with_seed(1);
    for k in 1..=SLOT_COUNT {
        s.record_capture(still(k as u8));
        assert_eq!(s.captured_count(), k);
        assert_eq!(s.cursor(), k.min(SLOT_COUNT));
    }
    assert!(s.is_complete());
}

#[test]
fn capture_on_a_complete_session_is_a_noop() {
    let mut s = Session::with_seed(1);
    for k in 0..SLOT_COUNT {
        s.record_capture(still(k as u8));
    }
    s.record_capture(still(99));
    assert_eq!(s.cursor(), SLOT_COUNT);
    assert_eq!(s.captured_count(), SLOT_COUNT);
    // The extra capture must not have overwritten any slot.
    for k in 0..SLOT_COUNT {
        let (_, _, px) = s.photo(k).unwrap().decode_rgba8().unwrap();
        assert_eq!(px[0], k as u8);
    }
}

#[test]
fn clear_slot_allows_direct_retake_without_touching_neighbours() {
    let mut s = Session::with_seed(1);
    for k in 0..SLOT_COUNT {
        s.record_capture(still(k as u8));
    }
    s.add_overlay(1, OverlayGlyph::Heart, Rgba::WHITE);

    s.clear_slot(1);
    assert!(s.photo(1).is_none());
    assert_eq!(s.cursor(), 1);
    assert_eq!(s.captured_count(), 3);
    // Overlays survive a retake by design.
    assert_eq!(s.overlays(1).len(), 1);

    s.record_capture(still(42));
    let (_, _, px) = s.photo(1).unwrap().decode_rgba8().unwrap();
    assert_eq!(px[0], 42);
    assert_eq!(s.cursor(), 2);
    // Other slots untouched.
    for k in [0usize, 2, 3] {
        let (_, _, px) = s.photo(k).unwrap().decode_rgba8().unwrap();
        assert_eq!(px[0], k as u8);
    }
}

#[test]
fn move_overlay_clamps_out_of_range_positions() {
    let mut s = Session::with_seed(3);
    s.add_overlay(0, OverlayGlyph::Star, Rgba::WHITE);

    s.move_overlay(0, 0, -5.0, 5.0);
    let o = &s.overlays(0)[0];
    assert_eq!((o.x, o.y), (0.0, 1.0));

    s.move_overlay(0, 0, 0.25, 0.75);
    let o = &s.overlays(0)[0];
    assert_eq!((o.x, o.y), (0.25, 0.75));

    // Out-of-range overlay index is a no-op.
    s.move_overlay(0, 9, 0.9, 0.9);
    assert_eq!(s.overlays(0)[0].x, 0.25);
}

#[test]
fn undo_removes_only_the_most_recent_overlay() {
    let mut s = Session::with_seed(7);
    s.add_overlay(0, OverlayGlyph::Star, Rgba::rgb(1, 0, 0));
    s.add_overlay(0, OverlayGlyph::Heart, Rgba::rgb(2, 0, 0));
    s.add_overlay(0, OverlayGlyph::Bolt, Rgba::rgb(3, 0, 0));

    s.undo_last_overlay(0);

    let remaining = s.overlays(0);
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].glyph, OverlayGlyph::Star);
    assert_eq!(remaining[1].glyph, OverlayGlyph::Heart);

    // Undo on an empty list is a no-op.
    s.undo_last_overlay(2);
    assert!(s.overlays(2).is_empty());
}

#[test]
fn remove_overlay_shifts_later_entries_down() {
    let mut s = Session::with_seed(7);
    s.add_overlay(0, OverlayGlyph::Star, Rgba::WHITE);
    s.add_overlay(0, OverlayGlyph::Heart, Rgba::WHITE);
    s.add_overlay(0, OverlayGlyph::Bolt, Rgba::WHITE);

    s.remove_overlay(0, 1);

    let remaining = s.overlays(0);
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0].glyph, OverlayGlyph::Star);
    assert_eq!(remaining[1].glyph, OverlayGlyph::Bolt);
}

#[test]
fn clear_overlays_empties_one_slot_only() {
    let mut s = Session::with_seed(7);
    s.add_overlay(0, OverlayGlyph::Star, Rgba::WHITE);
    s.add_overlay(0, OverlayGlyph::Heart, Rgba::WHITE);
    s.add_overlay(1, OverlayGlyph::Bolt, Rgba::WHITE);

    s.clear_overlays(0);

    assert!(s.overlays(0).is_empty());
    assert_eq!(s.overlays(1).len(), 1);
}

#[test]
fn reset_is_idempotent() {
    let mut s = Session::with_seed(5);
    s.select_theme("crt");
    s.record_capture(still(1));
    s.add_overlay(0, OverlayGlyph::Fire, Rgba::WHITE);

    s.reset();
    let snapshot = (
        s.theme().map(str::to_owned),
        s.cursor(),
        s.captured_count(),
        s.overlays(0).to_vec(),
    );
    s.reset();

    assert_eq!(snapshot.0, None);
    assert_eq!(snapshot.1, 0);
    assert_eq!(snapshot.2, 0);
    assert!(snapshot.3.is_empty());
    assert_eq!(s.theme(), None);
    assert_eq!(s.cursor(), 0);
    assert_eq!(s.captured_count(), 0);
    assert!(s.overlays(0).is_empty());
}

#[test]
fn selecting_a_theme_keeps_existing_work() {
    let mut s = Session::with_seed(5);
    s.record_capture(still(1));
    s.add_overlay(0, OverlayGlyph::Star, Rgba::WHITE);

    s.select_theme("gameboy");
    s.select_theme("crt");

    assert_eq!(s.theme(), Some("crt"));
    assert_eq!(s.captured_count(), 1);
    assert_eq!(s.overlays(0).len(), 1);
}
