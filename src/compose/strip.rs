//! The strip renderer: four stills, their overlays, and a theme in; one
//! PNG-encoded vertical strip out.
//!
//! Layout is fixed: outer padding, four bordered photo rectangles, and a
//! branding footer. The canvas height always accounts for four slots, so
//! empty slots leave background showing through. Rendering is deterministic
//! for identical inputs except for the footer's 4-digit serial, which is
//! cosmetic; seed the renderer to pin it down in tests.

use std::io::Cursor;

use chrono::Datelike;
use tracing::debug;

use crate::compose::surface::Surface;
use crate::compose::{glyphs, text};
use crate::foundation::core::{Rect, Rgba, StillImage};
use crate::foundation::error::{BoothError, BoothResult};
use crate::foundation::rng::Rng64;
use crate::session::model::{Overlay, SLOT_COUNT, Session};
use crate::theme::catalog::{StripTexture, Theme, ThemeCatalog};

pub const STRIP_WIDTH: u32 = 600;
pub const PHOTO_HEIGHT: u32 = 450; // 4:3 against the usable width
pub const PADDING: u32 = 16;
pub const BORDER_WIDTH: u32 = 6;
pub const FOOTER_HEIGHT: u32 = 60;

/// Product wordmark stamped into the footer.
pub const WORDMARK: &str = "BITBOOTH";

/// Usable photo width inside the outer padding.
pub const fn photo_width() -> u32 {
    STRIP_WIDTH - 2 * PADDING
}

/// Vertical distance from one photo's top edge to the next.
const fn slot_advance() -> u32 {
    PHOTO_HEIGHT + 2 * BORDER_WIDTH + PADDING
}

/// Full canvas height, always sized for four slots.
pub const fn strip_height() -> u32 {
    PADDING + slot_advance() * SLOT_COUNT as u32 + FOOTER_HEIGHT + PADDING
}

/// The photo rectangle of a slot (border excluded), in canvas pixels.
pub fn photo_rect(slot: usize) -> Rect {
    let x = f64::from(PADDING);
    let y = f64::from(PADDING + slot as u32 * slot_advance());
    Rect::new(x, y, x + f64::from(photo_width()), y + f64::from(PHOTO_HEIGHT))
}

/// A finished strip: PNG bytes plus pixel dimensions.
#[derive(Clone, Debug)]
pub struct EncodedStrip {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Renders strips. Holds the serial RNG and the footer year so both can be
/// pinned for reproducible output.
pub struct StripRenderer {
    rng: Rng64,
    year: i32,
}

impl StripRenderer {
    pub fn new() -> Self {
        Self {
            rng: Rng64::from_entropy(),
            year: chrono::Local::now().year(),
        }
    }

    /// Deterministic serial numbers for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Rng64::new(seed),
            year: chrono::Local::now().year(),
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Compose the final strip. Any undecodable photo fails the whole
    /// generation; nothing partially drawn is reused.
    pub fn generate(
        &mut self,
        photos: &[Option<StillImage>; SLOT_COUNT],
        theme: &Theme,
        overlays: &[Vec<Overlay>; SLOT_COUNT],
    ) -> BoothResult<EncodedStrip> {
        let mut canvas = Surface::new(STRIP_WIDTH, strip_height());
        canvas.fill(theme.strip_bg);
        draw_texture(&mut canvas, theme.texture);

        for slot in 0..SLOT_COUNT {
            let Some(still) = &photos[slot] else {
                debug!(slot, "empty slot skipped");
                continue;
            };
            let (src_w, src_h, rgba) = still.decode_rgba8()?;

            let rect = photo_rect(slot);
            let (x, y) = (rect.x0 as i64, rect.y0 as i64);
            let (w, h) = (rect.width() as i64, rect.height() as i64);
            let b = i64::from(BORDER_WIDTH);

            canvas.fill_rect(x - b, y - b, w + 2 * b, h + 2 * b, theme.strip_border);
            canvas.draw_cover(&rgba, src_w, src_h, x, y, w as u32, h as u32)?;
            if let Some(tint) = theme.tint {
                canvas.fill_rect(x, y, w, h, tint);
            }
            for overlay in &overlays[slot] {
                draw_overlay(&mut canvas, overlay, rect)?;
            }
            draw_label(&mut canvas, slot, rect, theme.accent);
        }

        self.draw_footer(&mut canvas, theme);
        encode(canvas)
    }

    /// Convenience wrapper: render straight from a session, resolving its
    /// theme key through the catalog (unknown or unset keys fall back to the
    /// catalog's first theme).
    pub fn generate_for_session(
        &mut self,
        session: &Session,
        catalog: &ThemeCatalog,
    ) -> BoothResult<EncodedStrip> {
        let theme = catalog.get(session.theme().unwrap_or_default());
        self.generate(session.photos(), theme, session.overlay_lists())
    }

    fn draw_footer(&mut self, canvas: &mut Surface, theme: &Theme) {
        let footer_y = f64::from(strip_height() - FOOTER_HEIGHT - PADDING);
        let center_x = f64::from(STRIP_WIDTH) / 2.0;

        // Wordmark: 7 rows at 3px per cell, bottom-aligned 30px in.
        text::draw_text(
            canvas,
            WORDMARK,
            center_x,
            footer_y + 30.0 - text::text_height(3.0),
            3.0,
            theme.accent,
        );

        let serial = self.rng.next_u64() % 10_000;
        let meta = format!(
            "STRIP #{serial:04} • {} • {}",
            self.year,
            theme.title.to_uppercase()
        );
        text::draw_text(
            canvas,
            &meta,
            center_x,
            footer_y + 55.0 - text::text_height(2.0),
            2.0,
            theme.strip_border,
        );
    }
}

impl Default for StripRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_texture(canvas: &mut Surface, texture: StripTexture) {
    let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));
    match texture {
        StripTexture::None => {}
        StripTexture::DotMatrix { color } => {
            for y in (0..h).step_by(4) {
                for x in (0..w).step_by(4) {
                    canvas.fill_rect(x, y, 2, 2, color);
                }
            }
        }
        StripTexture::Scanlines { color } => {
            for y in (0..h).step_by(4) {
                canvas.fill_rect(0, y, w, 2, color);
            }
        }
    }
}

fn draw_overlay(canvas: &mut Surface, overlay: &Overlay, rect: Rect) -> BoothResult<()> {
    let size_px = (overlay.size.clamp(0.0, 1.0) * rect.width()).round() as u32;
    let (side, tile) = glyphs::rasterize_glyph(overlay.glyph, overlay.color, size_px)?;
    // Center-anchored on the normalized position.
    let cx = rect.x0 + overlay.x.clamp(0.0, 1.0) * rect.width();
    let cy = rect.y0 + overlay.y.clamp(0.0, 1.0) * rect.height();
    let x = (cx - f64::from(side) / 2.0).round() as i64;
    let y = (cy - f64::from(side) / 2.0).round() as i64;
    canvas.blit_over(x, y, &tile, side, side)
}

fn draw_label(canvas: &mut Surface, slot: usize, rect: Rect, accent: Rgba) {
    let chip_x = rect.x1 as i64 - 40;
    let chip_y = rect.y1 as i64 - 24;
    canvas.fill_rect(chip_x, chip_y, 36, 20, accent);
    text::draw_text(
        canvas,
        &format!("{:02}", slot + 1),
        rect.x1 - 22.0,
        rect.y1 - 21.0,
        2.0,
        Rgba::WHITE,
    );
}

fn encode(canvas: Surface) -> BoothResult<EncodedStrip> {
    let (width, height) = (canvas.width(), canvas.height());
    let data = canvas.into_straight_rgba8();
    let mut png = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut png,
        &data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| BoothError::generation(format!("encode strip: {e}")))?;
    Ok(EncodedStrip {
        width,
        height,
        png: png.into_inner(),
    })
}
