//! Rasterisation of a QR symbol onto an exact square canvas.
//!
//! The module-to-pixel mapping is [`SymbolGeometry::module_rect`], the same mapping the protected
//! region classifier uses, so the finder patterns of a rendered symbol land exactly on the
//! compositor's protected regions.

mod logo;
mod shape;

pub use logo::{overlay_logo, LogoOptions, MAX_LOGO_RATIO};

use image::{Rgba, RgbaImage};
use qrcode::{types::QrError, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    common::{
        color::{BLACK, WHITE},
        error::{ComposeError, ComposeResult},
    },
    geometry::SymbolGeometry,
};
use shape::Neighbours;

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ECLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl From<ECLevel> for EcLevel {
    fn from(level: ECLevel) -> Self {
        match level {
            ECLevel::L => EcLevel::L,
            ECLevel::M => EcLevel::M,
            ECLevel::Q => EcLevel::Q,
            ECLevel::H => EcLevel::H,
        }
    }
}

// Style
//------------------------------------------------------------------------------

/// Shape of dark data modules.
///
/// The rounded variants look at the four edge neighbours of a module and only round corners that
/// face light modules, so runs of dark modules join into continuous strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DotStyle {
    #[default]
    Square,
    /// Separate discs, 90% of the module side across.
    Dots,
    /// Corners round where both neighbours sharing them are light.
    Rounded,
    /// Corners round where either neighbour sharing them is light.
    ExtraRounded,
    /// Like `Rounded`, top-left and bottom-right corners only.
    Classy,
    /// Like `ExtraRounded`, top-left and bottom-right corners only.
    ClassyRounded,
}

/// Shape of the three finder patterns, ring and centre stone alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CornerStyle {
    #[default]
    Square,
    Dot,
    ExtraRounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolStyle {
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    /// Shape of data modules. Finder modules follow `corners` instead.
    pub dots: DotStyle,
    pub corners: CornerStyle,
    pub quiet_zone: u32,
}

impl Default for SymbolStyle {
    fn default() -> Self {
        Self {
            dark: BLACK,
            light: WHITE,
            dots: DotStyle::Square,
            corners: CornerStyle::Square,
            quiet_zone: 1,
        }
    }
}

// Symbol
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Symbol {
    pub image: RgbaImage,
    pub geometry: SymbolGeometry,
    pub version: u32,
}

// Builder
//------------------------------------------------------------------------------

pub struct SymbolBuilder<'a> {
    data: &'a [u8],
    version: Option<u32>,
    ec_level: ECLevel,
    style: SymbolStyle,
}

impl<'a> SymbolBuilder<'a> {
    /// Version 3 at EC level H, the layout the compositor protects by default.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: Some(3), ec_level: ECLevel::H, style: SymbolStyle::default() }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: u32) -> &mut Self {
        self.version = Some(version);
        self
    }

    /// Lets the encoder pick the smallest version that fits.
    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn style(&mut self, style: SymbolStyle) -> &mut Self {
        self.style = style;
        self
    }

    pub fn dots(&mut self, dots: DotStyle) -> &mut Self {
        self.style.dots = dots;
        self
    }

    pub fn corners(&mut self, corners: CornerStyle) -> &mut Self {
        self.style.corners = corners;
        self
    }

    pub fn quiet_zone(&mut self, quiet_zone: u32) -> &mut Self {
        self.style.quiet_zone = quiet_zone;
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!(
                "{{ Version: {v}, Ec level: {:?}, Dots: {:?}, Corners: {:?} }}",
                self.ec_level, self.style.dots, self.style.corners
            ),
            None => format!(
                "{{ Version: None, Ec level: {:?}, Dots: {:?}, Corners: {:?} }}",
                self.ec_level, self.style.dots, self.style.corners
            ),
        }
    }

    pub fn build(&self, canvas: u32) -> ComposeResult<Symbol> {
        debug!("Generating symbol {}...", self.metadata());
        if self.data.is_empty() {
            return Err(ComposeError::EmptyData);
        }

        debug!("Encoding data...");
        let ec = self.ec_level.into();
        let code = match self.version {
            Some(v) if !(1..=40).contains(&v) => return Err(ComposeError::InvalidOption("version")),
            Some(v) => QrCode::with_version(self.data, qrcode::Version::Normal(v as i16), ec),
            None => QrCode::with_error_correction_level(self.data, ec),
        }
        .map_err(|e| match e {
            QrError::DataTooLong => ComposeError::DataTooLong,
            QrError::InvalidVersion => ComposeError::InvalidOption("version"),
            _ => ComposeError::InvalidOption("data"),
        })?;

        let version = match code.version() {
            qrcode::Version::Normal(v) | qrcode::Version::Micro(v) => v as u32,
        };
        let width = code.width() as u32;
        let geometry = SymbolGeometry::new(width, self.style.quiet_zone);
        if canvas == 0 || geometry.grid_modules() > canvas {
            return Err(ComposeError::InvalidDimensions { width: canvas, height: canvas });
        }

        debug!("Drawing {width}x{width} modules onto {canvas}px canvas...");
        let image = self.draw(&code, &geometry, canvas);

        Ok(Symbol { image, geometry, version })
    }

    fn draw(&self, code: &QrCode, geometry: &SymbolGeometry, canvas: u32) -> RgbaImage {
        let qz = geometry.quiet_zone;
        let width = geometry.symbol_modules;
        let SymbolStyle { dark, light, dots, corners, .. } = self.style;
        let mut img = RgbaImage::from_pixel(canvas, canvas, light);

        // Symbol coordinates, anything outside the symbol is light
        let is_dark = |r: i64, c: i64| {
            (0..width as i64).contains(&r)
                && (0..width as i64).contains(&c)
                && code[(c as usize, r as usize)] == qrcode::Color::Dark
        };

        for r in 0..width {
            for c in 0..width {
                let (ri, ci) = (r as i64, c as i64);
                if !is_dark(ri, ci) {
                    continue;
                }
                let finder = geometry.is_finder_module(r, c);
                if finder && corners != CornerStyle::Square {
                    continue;
                }
                let rect = geometry.module_rect(qz + c, qz + r, 1, 1, canvas);
                let n = Neighbours {
                    top: is_dark(ri - 1, ci),
                    right: is_dark(ri, ci + 1),
                    bottom: is_dark(ri + 1, ci),
                    left: is_dark(ri, ci - 1),
                };
                let style = if finder { DotStyle::Square } else { dots };
                shape::fill_module(&mut img, rect, style, n, dark);
            }
        }

        if corners != CornerStyle::Square {
            for (c, r) in geometry.finder_origins() {
                let ring = geometry.finder_rect((c, r), canvas);
                let hole = geometry.module_rect(c + 1, r + 1, 5, 5, canvas);
                let stone = geometry.module_rect(c + 2, r + 2, 3, 3, canvas);
                shape::fill_finder(&mut img, ring, hole, stone, corners, dark, light);
            }
        }
        img
    }
}

#[cfg(test)]
mod symbol_builder_tests {
    use test_case::test_case;

    use super::{CornerStyle, DotStyle, ECLevel, SymbolBuilder, SymbolStyle};
    use crate::{
        common::color::{BLACK, WHITE},
        geometry::compute_protected_regions,
        reader::QRReader,
        ComposeError,
    };

    #[test]
    fn test_metadata() {
        let mut builder = SymbolBuilder::new(b"Hello, world!");
        builder.version(2).ec_level(ECLevel::L).dots(DotStyle::Dots);
        assert_eq!(builder.metadata(), "{ Version: 2, Ec level: L, Dots: Dots, Corners: Square }");
        builder.unset_version().corners(CornerStyle::Dot);
        assert_eq!(builder.metadata(), "{ Version: None, Ec level: L, Dots: Dots, Corners: Dot }");
    }

    #[test]
    fn test_default_symbol_matches_protected_regions() {
        let symbol = SymbolBuilder::new(b"https://example.com").build(1024).unwrap();
        assert_eq!(symbol.version, 3);
        assert_eq!(symbol.geometry.grid_modules(), 31);
        assert_eq!(symbol.image.dimensions(), (1024, 1024));

        // Each protected finder square is a dark finder framed by a light ring
        let regions = compute_protected_regions(1024);
        for (r, origin) in regions[..3].iter().zip(symbol.geometry.finder_origins()) {
            let finder = symbol.geometry.finder_rect(origin, 1024);
            assert_eq!(*symbol.image.get_pixel(finder.x, finder.y), BLACK);
            assert_eq!(*symbol.image.get_pixel(finder.right() - 1, finder.bottom() - 1), BLACK);
            assert_eq!(*symbol.image.get_pixel(r.x, r.y), WHITE);
            assert_eq!(*symbol.image.get_pixel(r.right() - 1, r.bottom() - 1), WHITE);
            assert!(r.contains(finder.x, finder.y));
            assert!(r.contains(finder.right(), finder.bottom()));
        }
        assert_eq!(*symbol.image.get_pixel(0, 0), WHITE);
        assert_eq!(*symbol.image.get_pixel(1023, 1023), WHITE);
    }

    #[test_case(DotStyle::Square, CornerStyle::Square, ECLevel::H)]
    #[test_case(DotStyle::Dots, CornerStyle::Square, ECLevel::H)]
    #[test_case(DotStyle::Rounded, CornerStyle::Square, ECLevel::H)]
    #[test_case(DotStyle::ExtraRounded, CornerStyle::Square, ECLevel::H)]
    #[test_case(DotStyle::Classy, CornerStyle::Square, ECLevel::H)]
    #[test_case(DotStyle::ClassyRounded, CornerStyle::Square, ECLevel::H)]
    #[test_case(DotStyle::Square, CornerStyle::ExtraRounded, ECLevel::H)]
    #[test_case(DotStyle::Rounded, CornerStyle::ExtraRounded, ECLevel::H)]
    #[test_case(DotStyle::ClassyRounded, CornerStyle::ExtraRounded, ECLevel::Q)]
    #[test_case(DotStyle::Square, CornerStyle::Square, ECLevel::L)]
    fn test_rendered_symbol_reads_back(dots: DotStyle, corners: CornerStyle, ec_level: ECLevel) {
        let data = "Hello, world!";
        let symbol = SymbolBuilder::new(data.as_bytes())
            .dots(dots)
            .corners(corners)
            .ec_level(ec_level)
            .build(512)
            .unwrap();
        assert_eq!(QRReader::read(&symbol.image).unwrap(), data);
    }

    #[test_case(DotStyle::Square)]
    #[test_case(DotStyle::Rounded)]
    #[test_case(DotStyle::Dots)]
    fn test_dot_corners_shape(dots: DotStyle) {
        let canvas = 620;
        let symbol = SymbolBuilder::new(b"dot corners")
            .dots(dots)
            .corners(CornerStyle::Dot)
            .build(canvas)
            .unwrap();
        let img = &symbol.image;

        for origin in symbol.geometry.finder_origins() {
            let ring = symbol.geometry.finder_rect(origin, canvas);
            let (cx, cy) = (ring.x + (ring.width - 1) / 2, ring.y + (ring.height - 1) / 2);
            let module = ring.width / 7;

            // Round ring: corners cut, edges dark
            assert_eq!(*img.get_pixel(ring.x, ring.y), WHITE);
            assert_eq!(*img.get_pixel(ring.right() - 1, ring.bottom() - 1), WHITE);
            assert_eq!(*img.get_pixel(ring.x + 1, cy), BLACK);
            assert_eq!(*img.get_pixel(cx, ring.y + 1), BLACK);

            // Light hole between ring and stone, dark stone in the middle
            assert_eq!(*img.get_pixel(ring.x + module + module / 2, cy), WHITE);
            assert_eq!(*img.get_pixel(cx, cy), BLACK);
        }
    }

    #[test]
    fn test_extra_rounded_corners_keep_finder_layout() {
        let canvas = 620;
        let symbol =
            SymbolBuilder::new(b"corners").corners(CornerStyle::ExtraRounded).build(canvas).unwrap();
        let square = SymbolBuilder::new(b"corners").build(canvas).unwrap();

        for origin in symbol.geometry.finder_origins() {
            let ring = symbol.geometry.finder_rect(origin, canvas);
            let module = ring.width / 7;
            assert_eq!(*symbol.image.get_pixel(ring.x, ring.y), WHITE);
            assert_eq!(*square.image.get_pixel(ring.x, ring.y), BLACK);

            // Along the middle row the pattern still reads dark, light, dark, light, dark
            let cy = ring.y + ring.height / 2;
            for m in 0..7 {
                let x = ring.x + m * module + module / 2;
                let expected = if m == 1 || m == 5 { WHITE } else { BLACK };
                assert_eq!(*symbol.image.get_pixel(x, cy), expected);
            }
        }

        // Data modules are untouched by the corner style
        let outside = |x: u32, y: u32| {
            symbol.geometry.finder_origins().iter().all(|&o| {
                let r = symbol.geometry.finder_rect(o, canvas);
                !r.contains(x, y)
            })
        };
        for (x, y, p) in symbol.image.enumerate_pixels() {
            if outside(x, y) {
                assert_eq!(p, square.image.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_auto_version() {
        let data = "a".repeat(200);
        let symbol = SymbolBuilder::new(data.as_bytes()).unset_version().build(1024).unwrap();
        assert!(symbol.version > 3);
        assert_eq!(symbol.geometry.symbol_modules, 17 + 4 * symbol.version);
    }

    #[test]
    fn test_custom_style() {
        let style = SymbolStyle {
            dark: image::Rgba([20, 30, 120, 255]),
            light: image::Rgba([250, 245, 230, 255]),
            dots: DotStyle::Square,
            corners: CornerStyle::Square,
            quiet_zone: 4,
        };
        let symbol = SymbolBuilder::new(b"styled").style(style).build(370).unwrap();
        assert_eq!(symbol.geometry.grid_modules(), 37);
        assert_eq!(*symbol.image.get_pixel(0, 0), style.light);
        assert_eq!(*symbol.image.get_pixel(45, 45), style.dark);
    }

    #[test]
    fn test_errors() {
        assert_eq!(SymbolBuilder::new(b"").build(256).unwrap_err(), ComposeError::EmptyData);
        let long = "x".repeat(400);
        assert_eq!(SymbolBuilder::new(long.as_bytes()).build(256).unwrap_err(), ComposeError::DataTooLong);
        assert_eq!(
            SymbolBuilder::new(b"v").version(41).build(256).unwrap_err(),
            ComposeError::InvalidOption("version")
        );
        assert_eq!(
            SymbolBuilder::new(b"v").build(30).unwrap_err(),
            ComposeError::InvalidDimensions { width: 30, height: 30 }
        );
    }
}
