use image::{
    imageops::{self, FilterType},
    Rgba, RgbaImage,
};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect as DrawRect};

use crate::common::{
    color::WHITE,
    error::{ComposeError, ComposeResult},
};

/// Largest logo side, as a share of the canvas, that EC level H still recovers from.
pub const MAX_LOGO_RATIO: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoOptions {
    /// Side of the centred logo square as a share of the canvas, in `(0, 0.4]`.
    pub size_ratio: f32,
    /// Clear the modules under the logo square to `backdrop` before drawing the logo.
    pub hide_background_dots: bool,
    pub backdrop: Rgba<u8>,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self { size_ratio: 0.3, hide_background_dots: true, backdrop: WHITE }
    }
}

/// Draws `logo` centred on a copy of `qr`, scaled to fit a square of `size_ratio * width`.
pub fn overlay_logo(qr: &RgbaImage, logo: &RgbaImage, opts: &LogoOptions) -> ComposeResult<RgbaImage> {
    if !(opts.size_ratio > 0.0 && opts.size_ratio <= MAX_LOGO_RATIO) {
        return Err(ComposeError::InvalidOption("logoSizeRatio"));
    }
    let (w, h) = qr.dimensions();
    let (lw, lh) = logo.dimensions();
    if w == 0 || h == 0 {
        return Err(ComposeError::InvalidDimensions { width: w, height: h });
    }
    if lw == 0 || lh == 0 {
        return Err(ComposeError::InvalidDimensions { width: lw, height: lh });
    }

    let side = ((w.min(h) as f32 * opts.size_ratio).round() as u32).max(1);
    let mut out = qr.clone();

    if opts.hide_background_dots {
        let x = (w - side) / 2;
        let y = (h - side) / 2;
        let rect = DrawRect::at(x as i32, y as i32).of_size(side, side);
        draw_filled_rect_mut(&mut out, rect, opts.backdrop);
    }

    // Preserve aspect ratio inside the square
    let scale = side as f32 / lw.max(lh) as f32;
    let nw = ((lw as f32 * scale).round() as u32).max(1);
    let nh = ((lh as f32 * scale).round() as u32).max(1);
    let resized = imageops::resize(logo, nw, nh, FilterType::Triangle);

    let x = (w - nw) / 2;
    let y = (h - nh) / 2;
    imageops::overlay(&mut out, &resized, x as i64, y as i64);

    Ok(out)
}
