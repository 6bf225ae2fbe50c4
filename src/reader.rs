use image::{imageops, GrayImage, RgbaImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use tracing::debug;

use crate::{
    blend::DARK_MODULE_MAX,
    common::error::{ComposeError, ComposeResult},
};

/// Standards decoder used to check that a composed image still scans.
///
/// The decoder thresholds against a moving row average, which art with large flat dark and light
/// areas throws off: a light module inside a bright patch can fall under the local mean. When the
/// plain luma image does not decode, it is retried as a global black and white image, first at
/// Otsu's level, then at the dark-module boundary the blend keeps every dark module under.
pub struct QRReader();

impl QRReader {
    /// Decodes the first readable symbol in `img`.
    pub fn read(img: &RgbaImage) -> ComposeResult<String> {
        debug!("Preparing image...");
        let luma = imageops::grayscale(img);
        let mut err = match Self::read_luma(&luma) {
            Ok(content) => return Ok(content),
            Err(e) => e,
        };

        for level in Self::levels(&luma) {
            debug!("Retrying at global threshold {level}...");
            match Self::read_luma(&threshold(&luma, level, ThresholdType::Binary)) {
                Ok(content) => return Ok(content),
                // A located but unreadable grid says more than a missing one
                Err(e @ ComposeError::Unreadable(_)) => err = e,
                Err(_) => {}
            }
        }
        Err(err)
    }

    /// Whether `img` decodes to exactly `expected`.
    pub fn verify(img: &RgbaImage, expected: &str) -> bool {
        matches!(Self::read(img), Ok(content) if content == expected)
    }

    fn levels(luma: &GrayImage) -> Vec<u8> {
        let mut levels = vec![otsu_level(luma), DARK_MODULE_MAX as u8];
        levels.dedup();
        levels
    }

    fn read_luma(luma: &GrayImage) -> ComposeResult<String> {
        let (w, h) = luma.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
            luma.get_pixel(x as u32, y as u32)[0]
        });

        debug!("Detecting grids...");
        let grids = prepared.detect_grids();
        if grids.is_empty() {
            return Err(ComposeError::SymbolNotFound);
        }

        let mut last_err = None;
        for g in grids.iter() {
            match g.decode() {
                Ok((_meta, content)) => return Ok(content),
                Err(e) => last_err = Some(e.to_string()),
            }
        }
        Err(ComposeError::Unreadable(last_err.unwrap_or_default()))
    }
}
