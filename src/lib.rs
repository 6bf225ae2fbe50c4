//! # artqr
//!
//! Pixel-level compositing of artwork into QR codes that stay scannable.
//!
//! A rendered QR image and an art image are resampled onto one square canvas and blended pixel
//! by pixel. Finder patterns and the start of the timing patterns are copied verbatim, and dark
//! modules are never lightened past the dark/light boundary, so a standard decoder still reads
//! the result.
//!
//! ## Features
//!
//! - **Blend strategies**: conservative, readable art, circular badge and classic wash
//! - **Content analysis**: edge detection and background/subject labelling of the art
//! - **Symbol rendering**: QR symbols drawn onto the exact grid the compositor protects
//! - **Logo overlay and background removal** for logo-style art
//! - **Verification**: decode the composed image to confirm it still scans
//!
//! ## Quick Start
//!
//! ### Composing art into a QR code
//!
//! ```rust,no_run
//! use artqr::{compose, BlendStrategy, SymbolBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let symbol = SymbolBuilder::new(b"https://example.com").build(1024)?;
//! let art = image::open("art.png")?.to_rgba8();
//!
//! let out = compose(&symbol.image, &art, BlendStrategy::ReadableArt, 1024)?;
//! out.save("artistic_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Full configuration
//!
//! ```rust,no_run
//! use artqr::{BlendStrategy, CompositionOptions, Compositor, QRReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts = CompositionOptions::builder()
//!     .strategy(BlendStrategy::Badge)  // Art inside a circle near the bottom-right corner
//!     .canvas_size(768)                // Output side in pixels
//!     .badge_radius_ratio(0.4)         // Badge radius as a share of half the canvas
//!     .build()?;
//!
//! let compositor = Compositor::new(opts)?;
//! let qr = image::open("qr.png")?.to_rgba8();
//! let art = image::open("art.png")?.to_rgba8();
//! let out = compositor.compose_or_fallback(&qr, &art);
//!
//! let content = QRReader::read(&out)?;
//! println!("Still scans: {content}");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod art;
pub mod blend;
pub mod codec;
pub mod common;
pub mod compositor;
pub mod geometry;
pub mod matte;
pub mod reader;
pub mod render;

pub use art::{ArtCache, ArtGenerator, ArtRequest, ArtStyle};
pub use blend::{BlendStrategy, BlendZone};
pub use common::error::{ComposeError, ComposeResult};
pub use compositor::{compose, CompositionOptions, Compositor};
pub use geometry::{compute_protected_regions, ProtectedRegion, SymbolGeometry};
pub use reader::QRReader;
pub use render::{CornerStyle, DotStyle, ECLevel, SymbolBuilder, SymbolStyle};

/// Raster image type used throughout the crate, 8-bit RGBA with straight alpha.
pub type RasterImage = image::RgbaImage;
