use image::RgbaImage;

use crate::common::color::channel_distance;

// Neighborhood radius, i.e. a 5x5 window clipped to the image
pub const EDGE_RADIUS: i64 = 2;

// Sum of absolute RGB differences above which a neighbor counts as an edge, out of 765
pub const EDGE_THRESHOLD: u32 = 30;

/// Whether `(x, y)` sits on a strong colour boundary: any pixel within [`EDGE_RADIUS`] differs
/// from it by more than [`EDGE_THRESHOLD`].
///
/// Reads only from `img`, so it is safe to call from any number of threads while a separate
/// output buffer is being written.
pub fn has_edge(x: u32, y: u32, img: &RgbaImage) -> bool {
    let (w, h) = img.dimensions();
    debug_assert!(x < w && y < h, "Pixel ({x}, {y}) out of bounds");

    let center = img.get_pixel(x, y);
    let (x, y) = (x as i64, y as i64);
    let (x0, x1) = ((x - EDGE_RADIUS).max(0), (x + EDGE_RADIUS).min(w as i64 - 1));
    let (y0, y1) = ((y - EDGE_RADIUS).max(0), (y + EDGE_RADIUS).min(h as i64 - 1));

    for ny in y0..=y1 {
        for nx in x0..=x1 {
            if nx == x && ny == y {
                continue;
            }
            let px = img.get_pixel(nx as u32, ny as u32);
            if channel_distance(center, px) > EDGE_THRESHOLD {
                return true;
            }
        }
    }
    false
}
