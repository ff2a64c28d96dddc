use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, ImageResult};

/// Encode an RGB(A) image as PNG bytes for the `imageFile` part.
///
/// PNG has no floating point color types, so those are narrowed to 8-bit RGBA first.
pub fn encode_png(image: &DynamicImage) -> ImageResult<Vec<u8>> {
    let narrowed;
    let image = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            narrowed = DynamicImage::ImageRgba8(image.to_rgba8());
            &narrowed
        }
        other => other,
    };

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Read width and height from the image header without decoding any pixels.
pub fn read_dimensions(bytes: &[u8]) -> ImageResult<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
}

/// Decode an image body fetched from a remote host; the format is sniffed from the bytes.
pub fn decode_image(bytes: &[u8]) -> ImageResult<DynamicImage> {
    image::load_from_memory(bytes)
}
