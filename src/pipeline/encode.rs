//! Image encoding: `DynamicImage` → opaque PNG bytes.
//!
//! Pages are flattened to 8-bit RGB before encoding, so a transparent
//! render never leaks an alpha channel into the archive or deck. PNG keeps
//! text edges crisp at every quality tier.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Encoded page: PNG bytes plus pixel dimensions.
pub struct EncodedPng {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Flatten to RGB and encode as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<EncodedPng, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

    debug!(
        "Encoded {}x{} image → {} bytes PNG",
        rgb.width(),
        rgb.height(),
        buf.len()
    );

    Ok(EncodedPng {
        data: buf,
        width: rgb.width(),
        height: rgb.height(),
    })
}
