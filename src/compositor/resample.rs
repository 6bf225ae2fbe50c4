use image::{
    imageops::{self, FilterType},
    RgbaImage,
};

use crate::common::{
    color::{mix, WHITE},
    error::{ComposeError, ComposeResult},
};

/// Center-crops `img` to a square and resizes it to `side x side` with nearest-neighbour
/// sampling, which keeps module edges hard and the output deterministic.
pub fn fit_square(img: &RgbaImage, side: u32) -> ComposeResult<RgbaImage> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || side == 0 {
        return Err(ComposeError::InvalidDimensions { width: w, height: h });
    }

    let sq = w.min(h);
    let cropped = match (w == sq, h == sq) {
        (true, true) => img.clone(),
        _ => imageops::crop_imm(img, (w - sq) / 2, (h - sq) / 2, sq, sq).to_image(),
    };

    if sq == side {
        return Ok(cropped);
    }
    Ok(imageops::resize(&cropped, side, side, FilterType::Nearest))
}

/// Flattens translucent pixels onto white so that removed backgrounds read as background.
pub fn flatten(mut img: RgbaImage) -> RgbaImage {
    for px in img.pixels_mut() {
        let a = px[3];
        if a == 255 {
            continue;
        }
        let t = a as f32 / 255.0;
        *px = mix(&WHITE, px, t);
        px[3] = 255;
    }
    img
}
