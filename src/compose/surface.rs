//! Premultiplied RGBA8 canvas and the compositing primitives the strip
//! renderer draws with: flat fills, tile blits, and cover-scaled image
//! blits.

use crate::foundation::core::Rgba;
use crate::foundation::error::{BoothError, BoothResult};

/// A premultiplied RGBA8 pixel buffer, row-major, tightly packed.
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`; callers keep coordinates in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        let px = color.to_premul();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Source-over fill of an axis-aligned rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgba) {
        let src = color.to_premul();
        if src[3] == 0 || w <= 0 || h <= 0 {
            return;
        }
        let x0 = x.clamp(0, i64::from(self.width)) as usize;
        let y0 = y.clamp(0, i64::from(self.height)) as usize;
        let x1 = (x + w).clamp(0, i64::from(self.width)) as usize;
        let y1 = (y + h).clamp(0, i64::from(self.height)) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize * 4;

        for row in y0..y1 {
            let line = &mut self.data[row * stride + x0 * 4..row * stride + x1 * 4];
            if color.is_opaque() {
                for chunk in line.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&src);
                }
            } else {
                for chunk in line.chunks_exact_mut(4) {
                    let out = over([chunk[0], chunk[1], chunk[2], chunk[3]], src);
                    chunk.copy_from_slice(&out);
                }
            }
        }
    }

    /// Source-over blit of a premultiplied tile with its top-left corner at
    /// `(x, y)`, clipped to the canvas.
    pub fn blit_over(
        &mut self,
        x: i64,
        y: i64,
        tile: &[u8],
        tile_w: u32,
        tile_h: u32,
    ) -> BoothResult<()> {
        if tile.len() != tile_w as usize * tile_h as usize * 4 {
            return Err(BoothError::validation(
                "blit tile byte length does not match dimensions",
            ));
        }
        let stride = self.width as usize * 4;
        let tile_stride = tile_w as usize * 4;

        for ty in 0..tile_h as i64 {
            let dy = y + ty;
            if dy < 0 || dy >= i64::from(self.height) {
                continue;
            }
            let src_row = &tile[ty as usize * tile_stride..(ty as usize + 1) * tile_stride];
            for tx in 0..tile_w as i64 {
                let dx = x + tx;
                if dx < 0 || dx >= i64::from(self.width) {
                    continue;
                }
                let s = tx as usize * 4;
                let src_px = [src_row[s], src_row[s + 1], src_row[s + 2], src_row[s + 3]];
                if src_px[3] == 0 {
                    continue;
                }
                let d = dy as usize * stride + dx as usize * 4;
                let dst_px = [self.data[d], self.data[d + 1], self.data[d + 2], self.data[d + 3]];
                self.data[d..d + 4].copy_from_slice(&over(dst_px, src_px));
            }
        }
        Ok(())
    }

    /// Draw a straight-alpha RGBA8 image into `dst` with cover behavior:
    /// uniform scale plus center-crop so the image exactly fills the target
    /// rectangle with no letterboxing. Samples bilinearly.
    pub fn draw_cover(
        &mut self,
        rgba8: &[u8],
        src_w: u32,
        src_h: u32,
        dst_x: i64,
        dst_y: i64,
        dst_w: u32,
        dst_h: u32,
    ) -> BoothResult<()> {
        if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
            return Err(BoothError::validation("cover draw with empty dimensions"));
        }
        if rgba8.len() != src_w as usize * src_h as usize * 4 {
            return Err(BoothError::validation(
                "cover source byte length does not match dimensions",
            ));
        }

        // Crop the excess from whichever axis the source is larger on.
        let src_ratio = f64::from(src_w) / f64::from(src_h);
        let dst_ratio = f64::from(dst_w) / f64::from(dst_h);
        let (crop_x, crop_y, crop_w, crop_h) = if src_ratio > dst_ratio {
            let ch = f64::from(src_h);
            let cw = ch * dst_ratio;
            ((f64::from(src_w) - cw) / 2.0, 0.0, cw, ch)
        } else {
            let cw = f64::from(src_w);
            let ch = cw / dst_ratio;
            (0.0, (f64::from(src_h) - ch) / 2.0, cw, ch)
        };

        let stride = self.width as usize * 4;
        for py in 0..dst_h {
            let dy = dst_y + i64::from(py);
            if dy < 0 || dy >= i64::from(self.height) {
                continue;
            }
            let v = crop_y + (f64::from(py) + 0.5) * crop_h / f64::from(dst_h) - 0.5;
            for px in 0..dst_w {
                let dx = dst_x + i64::from(px);
                if dx < 0 || dx >= i64::from(self.width) {
                    continue;
                }
                let u = crop_x + (f64::from(px) + 0.5) * crop_w / f64::from(dst_w) - 0.5;
                let sample = bilinear_sample(rgba8, src_w, src_h, u, v);
                let src_px = premul(sample);
                let d = dy as usize * stride + dx as usize * 4;
                let dst_px = [self.data[d], self.data[d + 1], self.data[d + 2], self.data[d + 3]];
                self.data[d..d + 4].copy_from_slice(&over(dst_px, src_px));
            }
        }
        Ok(())
    }

    /// Convert to straight-alpha RGBA8 for encoding.
    pub fn into_straight_rgba8(mut self) -> Vec<u8> {
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in px.iter_mut().take(3) {
                *c = (((u16::from(*c) * 255) + a / 2) / a).min(255) as u8;
            }
        }
        self.data
    }
}

/// Source-over for premultiplied RGBA8.
pub(crate) fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn premul(px: [u8; 4]) -> [u8; 4] {
    let a = px[3];
    if a == 255 {
        return px;
    }
    [
        mul_div255(u16::from(px[0]), u16::from(a)),
        mul_div255(u16::from(px[1]), u16::from(a)),
        mul_div255(u16::from(px[2]), u16::from(a)),
        a,
    ]
}

fn bilinear_sample(rgba8: &[u8], w: u32, h: u32, u: f64, v: f64) -> [u8; 4] {
    let u = u.clamp(0.0, f64::from(w - 1));
    let v = v.clamp(0.0, f64::from(h - 1));
    let x0 = u.floor() as usize;
    let y0 = v.floor() as usize;
    let x1 = (x0 + 1).min(w as usize - 1);
    let y1 = (y0 + 1).min(h as usize - 1);
    let fx = u - x0 as f64;
    let fy = v - y0 as f64;

    let at = |x: usize, y: usize, c: usize| f64::from(rgba8[(y * w as usize + x) * 4 + c]);
    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = at(x0, y0, c) * (1.0 - fx) + at(x1, y0, c) * fx;
        let bottom = at(x0, y1, c) * (1.0 - fx) + at(x1, y1, c) * fx;
        *slot = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
