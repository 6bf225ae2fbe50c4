use image::Rgba;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// Fill used when an art lookup misses the art buffer
pub const NEUTRAL_FILL: Rgba<u8> = Rgba([128, 128, 128, 255]);

// Channel statistics
//------------------------------------------------------------------------------

/// Mean of the RGB channels, in `[0, 255]`. Alpha is ignored.
#[inline]
pub fn brightness(px: &Rgba<u8>) -> f32 {
    let [r, g, b, _] = px.0;
    (r as f32 + g as f32 + b as f32) / 3.0
}

/// HSV-style saturation `(max - min) / max`, `0.0` for black.
#[inline]
pub fn saturation(px: &Rgba<u8>) -> f32 {
    let [r, g, b, _] = px.0;
    let max = r.max(g).max(b);
    if max == 0 {
        return 0.0;
    }
    let min = r.min(g).min(b);
    (max - min) as f32 / max as f32
}

/// Largest pairwise channel difference.
#[inline]
pub fn variance(px: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = px.0;
    r.abs_diff(g).max(g.abs_diff(b)).max(r.abs_diff(b))
}

/// Sum of absolute RGB differences, in `[0, 765]`.
#[inline]
pub fn channel_distance(a: &Rgba<u8>, b: &Rgba<u8>) -> u32 {
    (0..3).map(|i| a[i].abs_diff(b[i]) as u32).sum()
}

// Mixing
//------------------------------------------------------------------------------

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Linear mix of the RGB channels, `base * (1 - t) + over * t`. Alpha is taken from `base`.
#[inline]
pub fn mix(base: &Rgba<u8>, over: &Rgba<u8>, t: f32) -> Rgba<u8> {
    let inv = 1.0 - t;
    let mut out = *base;
    for i in 0..3 {
        out[i] = to_u8(base[i] as f32 * inv + over[i] as f32 * t);
    }
    out
}

/// Multiplies the RGB channels by `k`, keeping alpha.
#[inline]
pub fn scale(px: &Rgba<u8>, k: f32) -> Rgba<u8> {
    let mut out = *px;
    for i in 0..3 {
        out[i] = to_u8(px[i] as f32 * k);
    }
    out
}

/// Maps every RGB channel from `[0, 255]` into `[floor, 255]`.
#[inline]
pub fn lift(px: &Rgba<u8>, floor: u8) -> Rgba<u8> {
    let span = (255 - floor) as f32 / 255.0;
    let mut out = *px;
    for i in 0..3 {
        out[i] = to_u8(floor as f32 + px[i] as f32 * span);
    }
    out
}

/// Replaces the RGB channels of `px` while keeping its alpha.
#[inline]
pub fn with_rgb(px: &Rgba<u8>, rgb: &Rgba<u8>) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], px[3]])
}
