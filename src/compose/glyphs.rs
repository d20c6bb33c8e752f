//! Sticker glyph shapes and their rasterization.
//!
//! Each glyph is a vector path in a unit box; the renderer scales it to the
//! overlay's pixel size and fills it into a small premultiplied tile that
//! the surface then composites center-anchored.

use kurbo::{BezPath, Circle, Point, RoundedRect, Shape};

use crate::foundation::core::Rgba;
use crate::foundation::error::{BoothError, BoothResult};
use crate::session::model::OverlayGlyph;

/// The glyph's path in the `[0, 1]` unit box, y-down.
pub fn glyph_path(glyph: OverlayGlyph) -> BezPath {
    match glyph {
        OverlayGlyph::Star => star(5, 0.48, 0.19),
        OverlayGlyph::Sparkle => star(4, 0.48, 0.12),
        OverlayGlyph::Diamond => {
            polygon(&[(0.5, 0.04), (0.94, 0.5), (0.5, 0.96), (0.06, 0.5)])
        }
        OverlayGlyph::Bolt => polygon(&[
            (0.62, 0.04),
            (0.25, 0.56),
            (0.46, 0.56),
            (0.38, 0.96),
            (0.78, 0.42),
            (0.55, 0.42),
        ]),
        OverlayGlyph::Heart => {
            let mut p = BezPath::new();
            p.move_to((0.5, 0.35));
            p.curve_to((0.5, 0.2), (0.38, 0.1), (0.27, 0.1));
            p.curve_to((0.12, 0.1), (0.04, 0.24), (0.04, 0.36));
            p.curve_to((0.04, 0.58), (0.28, 0.72), (0.5, 0.92));
            p.curve_to((0.72, 0.72), (0.96, 0.58), (0.96, 0.36));
            p.curve_to((0.96, 0.24), (0.88, 0.1), (0.73, 0.1));
            p.curve_to((0.62, 0.1), (0.5, 0.2), (0.5, 0.35));
            p.close_path();
            p
        }
        OverlayGlyph::Gamepad => {
            let mut p = BezPath::new();
            extend(&mut p, &RoundedRect::new(0.05, 0.32, 0.95, 0.68, 0.14));
            extend(&mut p, &Circle::new(Point::new(0.2, 0.62), 0.15));
            extend(&mut p, &Circle::new(Point::new(0.8, 0.62), 0.15));
            p
        }
        OverlayGlyph::Badge => {
            let mut p = BezPath::new();
            extend(&mut p, &Circle::new(Point::new(0.5, 0.36), 0.27));
            let ribbon = polygon(&[
                (0.35, 0.52),
                (0.28, 0.95),
                (0.5, 0.8),
                (0.72, 0.95),
                (0.65, 0.52),
            ]);
            for el in ribbon.elements() {
                p.push(*el);
            }
            p
        }
        OverlayGlyph::Fire => {
            let mut p = BezPath::new();
            p.move_to((0.5, 0.04));
            p.curve_to((0.62, 0.22), (0.82, 0.36), (0.82, 0.6));
            p.curve_to((0.82, 0.82), (0.68, 0.96), (0.5, 0.96));
            p.curve_to((0.32, 0.96), (0.18, 0.82), (0.18, 0.6));
            p.curve_to((0.18, 0.46), (0.28, 0.38), (0.34, 0.28));
            p.curve_to((0.4, 0.2), (0.46, 0.12), (0.5, 0.04));
            p.close_path();
            p
        }
        OverlayGlyph::Rocket => polygon(&[
            (0.5, 0.02),
            (0.64, 0.2),
            (0.64, 0.6),
            (0.82, 0.84),
            (0.58, 0.76),
            (0.5, 0.98),
            (0.42, 0.76),
            (0.18, 0.84),
            (0.36, 0.6),
            (0.36, 0.2),
        ]),
    }
}

/// Fill a glyph into a square premultiplied RGBA8 tile of `size_px` a side.
/// Returns the tile side actually used (at least 1) and its pixels.
pub fn rasterize_glyph(
    glyph: OverlayGlyph,
    color: Rgba,
    size_px: u32,
) -> BoothResult<(u32, Vec<u8>)> {
    let side = size_px.max(1);
    let side_u16: u16 = side
        .try_into()
        .map_err(|_| BoothError::generation("overlay size exceeds raster limit"))?;

    let mut pixmap = vello_cpu::Pixmap::new(side_u16, side_u16);
    let mut ctx = vello_cpu::RenderContext::new(side_u16, side_u16);
    ctx.set_transform(vello_cpu::kurbo::Affine::scale(f64::from(side)));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    ctx.fill_path(&to_cpu_path(&glyph_path(glyph)));
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok((side, pixmap.data_as_u8_slice().to_vec()))
}

fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            path.move_to((x, y));
        } else {
            path.line_to((x, y));
        }
    }
    path.close_path();
    path
}

fn star(points: u32, outer: f64, inner: f64) -> BezPath {
    let step = std::f64::consts::PI / f64::from(points);
    let mut path = BezPath::new();
    for i in 0..points * 2 {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = -std::f64::consts::FRAC_PI_2 + f64::from(i) * step;
        let p = Point::new(0.5 + r * angle.cos(), 0.5 + r * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

fn extend(path: &mut BezPath, shape: &impl Shape) {
    for el in shape.path_elements(0.005) {
        path.push(el);
    }
}

fn to_cpu_path(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    fn conv(p: Point) -> vello_cpu::kurbo::Point {
        vello_cpu::kurbo::Point::new(p.x, p.y)
    }

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(conv(p)),
            PathEl::LineTo(p) => out.line_to(conv(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(conv(p1), conv(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(conv(p1), conv(p2), conv(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
