//! Module and finder shapes, drawn from filled rectangles and discs.

use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{draw_filled_circle_mut, draw_filled_rect_mut},
    rect::Rect as DrawRect,
};

use super::{CornerStyle, DotStyle};
use crate::geometry::Rect;

// Dot radius as a share of the module side
const DOT_RATIO: f32 = 0.45;

// Dark state of the four edge neighbours of a module
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct Neighbours {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

/// Which corners of a rectangle are rounded: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct Corners([bool; 4]);

impl Corners {
    pub const ALL: Self = Self([true; 4]);

    // A corner is exposed when the two neighbours sharing it are light. With `loose` one light
    // neighbour is enough.
    fn exposed(n: Neighbours, loose: bool) -> Self {
        let open = |a: bool, b: bool| if loose { !a || !b } else { !a && !b };
        Self([
            open(n.top, n.left),
            open(n.top, n.right),
            open(n.bottom, n.right),
            open(n.bottom, n.left),
        ])
    }

    // Leaf shape: only the top-left and bottom-right corners may round
    fn leaf(self) -> Self {
        Self([self.0[0], false, self.0[2], false])
    }
}

/// Fills one dark module in the given dot style.
pub(super) fn fill_module(img: &mut RgbaImage, rect: Rect, dots: DotStyle, n: Neighbours, color: Rgba<u8>) {
    match dots {
        DotStyle::Square => fill_rect(img, rect, color),
        DotStyle::Dots => {
            let side = rect.width.min(rect.height) as f32;
            let center = ((rect.x + rect.width / 2) as i32, (rect.y + rect.height / 2) as i32);
            let radius = (side * DOT_RATIO).round().max(1.0) as i32;
            draw_filled_circle_mut(img, center, radius, color);
        }
        DotStyle::Rounded => fill_rounded_rect(img, rect, u32::MAX, Corners::exposed(n, false), color),
        DotStyle::ExtraRounded => {
            fill_rounded_rect(img, rect, u32::MAX, Corners::exposed(n, true), color)
        }
        DotStyle::Classy => {
            fill_rounded_rect(img, rect, u32::MAX, Corners::exposed(n, false).leaf(), color)
        }
        DotStyle::ClassyRounded => {
            fill_rounded_rect(img, rect, u32::MAX, Corners::exposed(n, true).leaf(), color)
        }
    }
}

/// Draws a whole 7x7 finder: dark ring, light hole, dark stone.
pub(super) fn fill_finder(
    img: &mut RgbaImage,
    ring: Rect,
    hole: Rect,
    stone: Rect,
    corners: CornerStyle,
    dark: Rgba<u8>,
    light: Rgba<u8>,
) {
    match corners {
        CornerStyle::Square => {
            fill_rect(img, ring, dark);
            fill_rect(img, hole, light);
            fill_rect(img, stone, dark);
        }
        CornerStyle::Dot => {
            fill_rounded_rect(img, ring, u32::MAX, Corners::ALL, dark);
            fill_rounded_rect(img, hole, u32::MAX, Corners::ALL, light);
            fill_rounded_rect(img, stone, u32::MAX, Corners::ALL, dark);
        }
        CornerStyle::ExtraRounded => {
            // One module of rounding on the ring, half on the hole so the ring keeps its width
            let module = ring.width / 7;
            fill_rounded_rect(img, ring, module, Corners::ALL, dark);
            fill_rounded_rect(img, hole, module / 2, Corners::ALL, light);
            fill_rounded_rect(img, stone, module, Corners::ALL, dark);
        }
    }
}

pub(super) fn fill_rect(img: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let rect = DrawRect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height);
    draw_filled_rect_mut(img, rect, color);
}

/// Fills `rect` with the chosen corners rounded to `radius`, clamped so that opposite arcs never
/// overlap.
pub(super) fn fill_rounded_rect(
    img: &mut RgbaImage,
    rect: Rect,
    radius: u32,
    corners: Corners,
    color: Rgba<u8>,
) {
    let (w, h) = (rect.width, rect.height);
    let r = radius.min(w.min(h).saturating_sub(1) / 2);
    if r == 0 || corners == Corners::default() {
        fill_rect(img, rect, color);
        return;
    }

    // Cross through the middle, then the four r x r corners
    let (x, y, ri) = (rect.x as i32, rect.y as i32, r as i32);
    draw_filled_rect_mut(img, DrawRect::at(x + ri, y).of_size(w - 2 * r, h), color);
    draw_filled_rect_mut(img, DrawRect::at(x, y + ri).of_size(w, h - 2 * r), color);

    let (right, bottom) = (x + w as i32 - 1, y + h as i32 - 1);
    let spots = [
        ((x + ri, y + ri), (x, y)),
        ((right - ri, y + ri), (right - ri + 1, y)),
        ((right - ri, bottom - ri), (right - ri + 1, bottom - ri + 1)),
        ((x + ri, bottom - ri), (x, bottom - ri + 1)),
    ];
    for (round, (center, origin)) in corners.0.into_iter().zip(spots) {
        if round {
            draw_filled_circle_mut(img, center, ri, color);
        } else {
            draw_filled_rect_mut(img, DrawRect::at(origin.0, origin.1).of_size(r, r), color);
        }
    }
}
