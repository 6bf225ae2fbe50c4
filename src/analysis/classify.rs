use image::{Rgba, RgbaImage};

use super::edge::has_edge;
use crate::common::color::{brightness, saturation};

// Content class
//------------------------------------------------------------------------------

/// Content label of an art pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelClass {
    /// Flat, bright and desaturated; safe to suppress.
    #[default]
    Background,
    /// Dark, saturated or detailed; preserved or emphasized.
    Subject,
}

/// Both per-pixel labels the blend policies consult. Derived fresh for every composition.
///
/// `content` defaults to [`PixelClass::Background`] for pixels whose art was never analysed,
/// which routes them through the QR-preserving branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelClassification {
    pub protected: bool,
    pub content: PixelClass,
}

impl PixelClassification {
    pub fn new(protected: bool, content: PixelClass) -> Self {
        Self { protected, content }
    }
}

// Classifier
//------------------------------------------------------------------------------

/// Labels an art pixel, first match wins:
/// 1. an edge always makes it a subject
/// 2. bright and desaturated (`b > 220 && s < 0.2`, `b > 180 && s < 0.1`) or near white
///    (all channels above 240) makes it background
/// 3. anything else is a subject
pub fn classify(px: &Rgba<u8>, edge: bool) -> PixelClass {
    if edge {
        return PixelClass::Subject;
    }

    let b = brightness(px);
    let s = saturation(px);
    let near_white = px.0[..3].iter().all(|&c| c > 240);

    if (b > 220.0 && s < 0.2) || (b > 180.0 && s < 0.1) || near_white {
        PixelClass::Background
    } else {
        PixelClass::Subject
    }
}

/// [`classify`] with the edge flag computed on `img` at `(x, y)`.
pub fn classify_at(img: &RgbaImage, x: u32, y: u32) -> PixelClass {
    classify(img.get_pixel(x, y), has_edge(x, y, img))
}

#[cfg(test)]
mod classify_tests {
    use image::{Rgba, RgbaImage};
    use test_case::test_case;

    use super::{classify, classify_at, PixelClass};

    #[test_case(Rgba([255, 255, 255, 255]), PixelClass::Background; "white")]
    #[test_case(Rgba([230, 225, 215, 255]), PixelClass::Background; "bright haze")]
    #[test_case(Rgba([190, 190, 200, 255]), PixelClass::Background; "light grey")]
    #[test_case(Rgba([245, 250, 242, 255]), PixelClass::Background; "near white")]
    #[test_case(Rgba([255, 160, 200, 255]), PixelClass::Subject; "bright but saturated")]
    #[test_case(Rgba([190, 170, 200, 255]), PixelClass::Subject; "light but tinted")]
    #[test_case(Rgba([128, 128, 128, 255]), PixelClass::Subject; "mid grey")]
    #[test_case(Rgba([0, 0, 0, 255]), PixelClass::Subject; "black")]
    fn test_classify(px: Rgba<u8>, exp: PixelClass) {
        assert_eq!(classify(&px, false), exp);
    }

    #[test]
    fn test_edge_overrides_background() {
        assert_eq!(classify(&Rgba([255, 255, 255, 255]), true), PixelClass::Subject);
    }

    #[test]
    fn test_classify_at() {
        let mut img = RgbaImage::from_pixel(12, 12, Rgba([250, 250, 250, 255]));
        img.put_pixel(6, 6, Rgba([10, 10, 10, 255]));

        // White next to a dark speck is detail, white far away is background
        assert_eq!(classify_at(&img, 5, 5), PixelClass::Subject);
        assert_eq!(classify_at(&img, 0, 0), PixelClass::Background);
        assert_eq!(classify_at(&img, 6, 6), PixelClass::Subject);
    }
}
