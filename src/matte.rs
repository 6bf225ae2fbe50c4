//! Background removal for logos and art with near-white backdrops.

use image::{Rgba, RgbaImage};

use crate::common::color::{brightness, variance};

// Per-channel floor above which a pixel counts as white
const WHITE_FLOOR: u8 = 240;

// Corner colour matching
const CORNER_MIN_BRIGHTNESS: f32 = 150.0;
const CORNER_CLEAR_DIST: f32 = 50.0;
const CORNER_FADE_DIST: f32 = 80.0;

/// Makes every pixel whose RGB channels all exceed 240 fully transparent.
pub fn remove_white_background(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        if px.0[..3].iter().all(|&c| c > WHITE_FLOOR) {
            px[3] = 0;
        }
    }
}

/// Clears light low-variance pixels, then clears pixels close to the brightest corner colour.
pub fn remove_background_advanced(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let b = brightness(px);
        let var = variance(px);
        if (b > 200.0 && var < 30) || b > 230.0 || (b > 180.0 && var < 20) || (b > 160.0 && var < 15) {
            px[3] = 0;
        } else if b > 140.0 && b < 180.0 && var < 10 {
            px[3] = (px[3] as f32 * 0.2) as u8;
        }
    }

    let Some(bg) = brightest_corner(img) else {
        return;
    };
    if brightness(&bg) <= CORNER_MIN_BRIGHTNESS {
        return;
    }

    for px in img.pixels_mut() {
        let d = rgb_distance(px, &bg);
        if d < CORNER_CLEAR_DIST {
            px[3] = 0;
        } else if d < CORNER_FADE_DIST {
            px[3] = (px[3] as f32 * 0.3) as u8;
        }
    }
}

// Top-left, top-right, bottom-left, bottom-right. Ties keep the earlier corner.
fn brightest_corner(img: &RgbaImage) -> Option<Rgba<u8>> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
        .into_iter()
        .map(|(x, y)| *img.get_pixel(x, y))
        .reduce(|best, px| if brightness(&px) > brightness(&best) { px } else { best })
}

fn rgb_distance(a: &Rgba<u8>, b: &Rgba<u8>) -> f32 {
    (0..3)
        .map(|i| {
            let d = a[i] as f32 - b[i] as f32;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
