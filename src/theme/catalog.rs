//! Theme descriptors and the built-in catalog.
//!
//! Themes are read-only configuration data: the catalog is loaded once at
//! startup (the built-in set, or a replacement from JSON) and never mutated.

use crate::foundation::core::Rgba;
use crate::foundation::error::{BoothError, BoothResult};
use crate::theme::filter::{ColorFilter, FilterStep};

/// Procedural background texture drawn across the whole strip canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StripTexture {
    #[default]
    None,
    /// Fine dot grid (2x2 dots on a 4px pitch).
    DotMatrix { color: Rgba },
    /// Horizontal scanlines (2px lines on a 4px pitch).
    Scanlines { color: Rgba },
}

/// A named visual style for the booth.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    /// Stable lookup key.
    pub key: String,
    /// Display title, also stamped into the strip footer metadata.
    pub title: String,
    /// Short tagline for pickers.
    pub subtitle: String,
    /// Color transform chain applied to photos at preview/capture time.
    #[serde(default)]
    pub filter: ColorFilter,
    /// Semi-transparent recolor composited over each photo rectangle.
    #[serde(default)]
    pub tint: Option<Rgba>,
    /// Border frame color around each photo in the strip.
    pub strip_border: Rgba,
    /// Strip background fill.
    pub strip_bg: Rgba,
    /// Labels and branding color.
    pub accent: Rgba,
    #[serde(default)]
    pub texture: StripTexture,
}

/// The read-only theme table. Lookup by unknown key falls back to the first
/// entry, so a catalog is never empty; deserialization enforces that too.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CatalogData")]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

#[derive(serde::Deserialize)]
struct CatalogData {
    themes: Vec<Theme>,
}

impl TryFrom<CatalogData> for ThemeCatalog {
    type Error = BoothError;

    fn try_from(data: CatalogData) -> Result<Self, Self::Error> {
        Self::new(data.themes)
    }
}

impl ThemeCatalog {
    pub fn new(themes: Vec<Theme>) -> BoothResult<Self> {
        if themes.is_empty() {
            return Err(BoothError::validation(
                "theme catalog must contain at least one theme",
            ));
        }
        Ok(Self { themes })
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Resolve a theme by key, falling back to the first entry.
    pub fn get(&self, key: &str) -> &Theme {
        self.themes
            .iter()
            .find(|t| t.key == key)
            .unwrap_or(&self.themes[0])
    }

    /// The six built-in retro themes.
    pub fn builtin() -> Self {
        Self {
            themes: vec![
                Theme {
                    key: "gameboy".into(),
                    title: "Classic Game Boy".into(),
                    subtitle: "Monochrome Green".into(),
                    filter: ColorFilter::new(vec![
                        FilterStep::Grayscale(1.0),
                        FilterStep::Contrast(1.2),
                        FilterStep::Sepia(0.3),
                        FilterStep::Brightness(0.9),
                    ]),
                    tint: Some(Rgba::rgba(155, 188, 15, 64)),
                    strip_border: Rgba::rgb(0x30, 0x62, 0x30),
                    strip_bg: Rgba::rgb(0x9b, 0xbc, 0x0f),
                    accent: Rgba::rgb(0x0f, 0x38, 0x0f),
                    texture: StripTexture::DotMatrix {
                        color: Rgba::rgba(48, 98, 48, 13),
                    },
                },
                Theme {
                    key: "arcade".into(),
                    title: "Arcade Cabinet".into(),
                    subtitle: "Neon Borders".into(),
                    filter: ColorFilter::new(vec![
                        FilterStep::Contrast(1.3),
                        FilterStep::Saturate(1.4),
                        FilterStep::Brightness(1.05),
                    ]),
                    tint: Some(Rgba::rgba(136, 52, 239, 38)),
                    strip_border: Rgba::rgb(0x88, 0x34, 0xef),
                    strip_bg: Rgba::rgb(0x0f, 0x0f, 0x1a),
                    accent: Rgba::rgb(0x00, 0xf5, 0xff),
                    texture: StripTexture::None,
                },
                Theme {
                    key: "tamagotchi".into(),
                    title: "Tamagotchi".into(),
                    subtitle: "Cute Icons".into(),
                    filter: ColorFilter::new(vec![
                        FilterStep::Saturate(0.8),
                        FilterStep::Brightness(1.1),
                        FilterStep::Contrast(0.95),
                    ]),
                    tint: Some(Rgba::rgba(244, 114, 182, 38)),
                    strip_border: Rgba::rgb(0xf4, 0x72, 0xb6),
                    strip_bg: Rgba::rgb(0xfd, 0xf2, 0xf8),
                    accent: Rgba::rgb(0xec, 0x48, 0x99),
                    texture: StripTexture::None,
                },
                Theme {
                    key: "win95".into(),
                    title: "Windows 95".into(),
                    subtitle: "Grey Title Bars".into(),
                    filter: ColorFilter::new(vec![
                        FilterStep::Saturate(0.7),
                        FilterStep::Contrast(1.1),
                        FilterStep::Brightness(0.95),
                    ]),
                    tint: Some(Rgba::rgba(0, 0, 128, 20)),
                    strip_border: Rgba::rgb(0x80, 0x80, 0x80),
                    strip_bg: Rgba::rgb(0xc0, 0xc0, 0xc0),
                    accent: Rgba::rgb(0x00, 0x00, 0x80),
                    texture: StripTexture::None,
                },
                Theme {
                    key: "cyberpunk".into(),
                    title: "Cyberpunk".into(),
                    subtitle: "High Contrast Glitch".into(),
                    filter: ColorFilter::new(vec![
                        FilterStep::Contrast(1.4),
                        FilterStep::Saturate(1.6),
                        FilterStep::Brightness(1.1),
                        FilterStep::HueRotate(10.0),
                    ]),
                    tint: Some(Rgba::rgba(0, 245, 255, 31)),
                    strip_border: Rgba::rgb(0x00, 0xf5, 0xff),
                    strip_bg: Rgba::rgb(0x0d, 0x02, 0x21),
                    accent: Rgba::rgb(0xff, 0x00, 0x6e),
                    texture: StripTexture::None,
                },
                Theme {
                    key: "crt".into(),
                    title: "CRT Monitor".into(),
                    subtitle: "Scanline Overlays".into(),
                    filter: ColorFilter::new(vec![
                        FilterStep::Contrast(1.2),
                        FilterStep::Brightness(0.9),
                        FilterStep::Saturate(0.9),
                    ]),
                    tint: Some(Rgba::rgba(255, 255, 255, 13)),
                    strip_border: Rgba::rgb(0x44, 0x44, 0x44),
                    strip_bg: Rgba::rgb(0x11, 0x11, 0x11),
                    accent: Rgba::rgb(0x33, 0xff, 0x33),
                    texture: StripTexture::Scanlines {
                        color: Rgba::rgba(0, 0, 0, 26),
                    },
                },
            ],
        }
    }
}
