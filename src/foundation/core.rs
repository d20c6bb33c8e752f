use std::io::Cursor;
use std::sync::Arc;

use crate::foundation::error::{BoothError, BoothResult};

pub use kurbo::{Affine, BezPath, Point, Rect};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Premultiplied RGBA8 (r,g,b multiplied by a).
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// An immutable captured still: encoded PNG bytes plus pixel dimensions.
///
/// Produced once by capture and never mutated; a retake replaces the whole
/// value. The buffer is shared so sessions, workers, and previews can hold
/// the same still without copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillImage {
    width: u32,
    height: u32,
    bytes: Arc<Vec<u8>>,
}

impl StillImage {
    /// Wrap an already-encoded buffer. The bytes are treated as opaque until
    /// decode time; a corrupt buffer surfaces as a generation error there.
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes: Arc::new(bytes),
        }
    }

    /// Wrap encoded PNG bytes, reading the dimensions from the header.
    pub fn from_png_bytes(bytes: Vec<u8>) -> BoothResult<Self> {
        let img = image::load_from_memory(&bytes)
            .map_err(|e| BoothError::generation(format!("decode still image: {e}")))?;
        Ok(Self::new(img.width(), img.height(), bytes))
    }

    /// Encode a straight-alpha RGBA8 buffer as a PNG still.
    pub fn from_rgba8(width: u32, height: u32, rgba8: &[u8]) -> BoothResult<Self> {
        if rgba8.len() != width as usize * height as usize * 4 {
            return Err(BoothError::validation(
                "still image byte length does not match dimensions",
            ));
        }

        let mut bytes = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut bytes,
            rgba8,
            width,
            height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| BoothError::generation(format!("encode still image: {e}")))?;

        Ok(Self::new(width, height, bytes.into_inner()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode back to straight-alpha RGBA8 with actual decoded dimensions.
    pub fn decode_rgba8(&self) -> BoothResult<(u32, u32, Vec<u8>)> {
        let img = image::load_from_memory(&self.bytes)
            .map_err(|e| BoothError::generation(format!("decode still image: {e}")))?;
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        Ok((w, h, rgba.into_raw()))
    }
}
