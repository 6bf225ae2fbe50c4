use image::{Rgba, RgbaImage};

use super::BlendZone;

// Badge
//------------------------------------------------------------------------------

/// Circular art zone placed near the bottom-right corner of the canvas.
///
/// Pixels are measured at their centres, i.e. pixel `(x, y)` sits at `(x + 0.5, y + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Badge {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub ring_width: f32,
}

impl Badge {
    /// `radius = radius_ratio * canvas / 2`, centre inset `inset_ratio * canvas` from the
    /// bottom-right edge of the circle's bounding box, ring `ring_ratio * canvas` wide.
    pub fn new(canvas: u32, radius_ratio: f32, inset_ratio: f32, ring_ratio: f32) -> Self {
        let s = canvas as f32;
        let radius = radius_ratio * s / 2.0;
        let c = s - radius - inset_ratio * s;
        Self { cx: c, cy: c, radius, ring_width: ring_ratio * s }
    }

    #[inline]
    fn dist_sq(&self, x: u32, y: u32) -> f32 {
        let dx = x as f32 + 0.5 - self.cx;
        let dy = y as f32 + 0.5 - self.cy;
        dx * dx + dy * dy
    }

    pub fn zone(&self, x: u32, y: u32) -> BlendZone {
        let d2 = self.dist_sq(x, y);
        let outer = self.radius + self.ring_width;
        if d2 <= self.radius * self.radius {
            BlendZone::InsideBadge
        } else if d2 <= outer * outer {
            BlendZone::BadgeRing
        } else {
            BlendZone::OutsideBadge
        }
    }

    /// Position of `(x, y)` in the badge's own bounding box, `(0, 0)` top-left, `(1, 1)`
    /// bottom-right.
    pub fn local(&self, x: u32, y: u32) -> (f32, f32) {
        let d = 2.0 * self.radius;
        let u = (x as f32 + 0.5 - (self.cx - self.radius)) / d;
        let v = (y as f32 + 0.5 - (self.cy - self.radius)) / d;
        (u, v)
    }

    /// Art pixel shown at canvas `(x, y)` once the whole art image is resampled into the badge.
    /// `None` when the remapped coordinate misses the art buffer.
    pub fn art_coord(&self, art: &RgbaImage, x: u32, y: u32) -> Option<(u32, u32)> {
        let (u, v) = self.local(x, y);
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let (w, h) = art.dimensions();
        let ax = (u * w as f32) as u32;
        let ay = (v * h as f32) as u32;
        (ax < w && ay < h).then_some((ax, ay))
    }

    pub fn sample(&self, art: &RgbaImage, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.art_coord(art, x, y).map(|(ax, ay)| *art.get_pixel(ax, ay))
    }
}
