//! Conversions between encoded bytes and the RGBA buffers the compositor works on.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};

use crate::common::error::{ComposeError, ComposeResult};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decodes PNG, JPEG, WebP or any other format `image` recognises into RGBA.
pub fn decode_image(bytes: &[u8]) -> ComposeResult<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(|e| ComposeError::ImageDecode(e.to_string()))?;
    Ok(img.to_rgba8())
}

pub fn encode_png(img: &RgbaImage) -> ComposeResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ComposeError::ImageEncode(e.to_string()))?;
    Ok(buf)
}

/// `data:image/png;base64,...` form of `img`.
pub fn to_data_url(img: &RgbaImage) -> ComposeResult<String> {
    let png = encode_png(img)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png)))
}

/// Decodes a base64 image data URL of any image media type.
pub fn from_data_url(url: &str) -> ComposeResult<RgbaImage> {
    let rest = url.strip_prefix("data:image/").ok_or(ComposeError::InvalidDataUrl)?;
    let (_, payload) = rest.split_once(";base64,").ok_or(ComposeError::InvalidDataUrl)?;
    let bytes = STANDARD.decode(payload.trim()).map_err(|_| ComposeError::InvalidDataUrl)?;
    decode_image(&bytes)
}
