//! Composition of a QR image and an art image onto one canvas.
//!
//! The pass reads from the two prepared input buffers and writes into a separate output buffer,
//! one row per task. No pixel depends on another output pixel, so rows run in parallel without
//! synchronisation and the result does not depend on scheduling.

mod options;
mod resample;

pub use options::{CompositionOptions, OptionsBuilder, DEFAULT_CANVAS_SIZE, MAX_CANVAS_SIZE};
pub use resample::{fit_square, flatten};

use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    analysis::{classify_at, PixelClass, PixelClassification},
    blend::{blend, Badge, BlendInput, BlendStrategy, BlendZone},
    codec::decode_image,
    common::error::ComposeResult,
    geometry::ProtectedRegion,
};

// Compositor
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Compositor {
    opts: CompositionOptions,
    regions: Vec<ProtectedRegion>,
    badge: Option<Badge>,
}

impl Compositor {
    /// Validates `opts` and precomputes the protected regions and badge placement shared by every
    /// composition.
    pub fn new(opts: CompositionOptions) -> ComposeResult<Self> {
        opts.validate()?;

        let s = opts.canvas_size;
        let regions = opts.geometry.protected_regions(s);
        let badge = opts.strategy.uses_badge().then(|| {
            Badge::new(s, opts.badge_radius_ratio, opts.badge_inset_ratio, opts.badge_ring_ratio)
        });

        Ok(Self { opts, regions, badge })
    }

    pub fn options(&self) -> &CompositionOptions {
        &self.opts
    }

    pub fn regions(&self) -> &[ProtectedRegion] {
        &self.regions
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    #[inline]
    pub fn is_protected(&self, x: u32, y: u32) -> bool {
        self.regions.iter().any(|r| r.contains(x, y))
    }

    /// Resamples both inputs onto the canvas and blends them. Inputs are never modified.
    pub fn compose(&self, qr: &RgbaImage, art: &RgbaImage) -> ComposeResult<RgbaImage> {
        let s = self.opts.canvas_size;
        debug!(strategy = self.opts.strategy.name(), canvas = s, "Composing");

        let qr = fit_square(qr, s)?;
        let art = flatten(fit_square(art, s)?);

        let mut out = RgbaImage::new(s, s);
        let row_len = s as usize * 4;
        let buf: &mut [u8] = &mut out;
        buf.par_chunks_exact_mut(row_len).enumerate().for_each(|(y, row)| {
            let y = y as u32;
            for (x, dst) in row.chunks_exact_mut(4).enumerate() {
                let px = self.compose_pixel(&qr, &art, x as u32, y);
                dst.copy_from_slice(&px.0);
            }
        });

        debug!("Composition done");
        Ok(out)
    }

    /// Decodes both inputs first. Fails with [`crate::ComposeError::ImageDecode`] before any
    /// pixel is produced if either does not parse.
    pub fn compose_bytes(&self, qr: &[u8], art: &[u8]) -> ComposeResult<RgbaImage> {
        let qr = decode_image(qr)?;
        let art = decode_image(art)?;
        self.compose(&qr, &art)
    }

    /// Composes, falling back to an untouched copy of `qr` on any error.
    pub fn compose_or_fallback(&self, qr: &RgbaImage, art: &RgbaImage) -> RgbaImage {
        match self.compose(qr, art) {
            Ok(img) => img,
            Err(e) => {
                warn!(error = %e, "Composition failed, falling back to plain QR");
                qr.clone()
            }
        }
    }

    fn compose_pixel(&self, qr: &RgbaImage, art: &RgbaImage, x: u32, y: u32) -> Rgba<u8> {
        let qr_px = *qr.get_pixel(x, y);
        let protected = self.is_protected(x, y);
        if protected {
            return qr_px;
        }

        let zone = self.badge.map_or(BlendZone::FullFrame, |b| b.zone(x, y));
        let (art_px, content) = match (zone, self.badge.as_ref()) {
            // Only badge pixels consult the content of the art
            (BlendZone::InsideBadge, Some(badge)) => match badge.art_coord(art, x, y) {
                Some((ax, ay)) => (Some(*art.get_pixel(ax, ay)), classify_at(art, ax, ay)),
                None => (None, PixelClass::Background),
            },
            _ => (Some(*art.get_pixel(x, y)), PixelClass::Background),
        };

        let input = BlendInput::new(qr_px, art_px, PixelClassification::new(protected, content), zone);
        blend(self.opts.strategy, &input)
    }
}

/// One-shot composition with default badge ratios and symbol geometry.
pub fn compose(
    qr: &RgbaImage,
    art: &RgbaImage,
    strategy: BlendStrategy,
    canvas_size: u32,
) -> ComposeResult<RgbaImage> {
    Compositor::new(CompositionOptions::new(strategy, canvas_size))?.compose(qr, art)
}
