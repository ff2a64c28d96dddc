use image::{DynamicImage, RgbImage, RgbaImage};

use crate::domain::validation::ValidationError;
use crate::domain::value::FULLSIZE_MAX_SIDE;

#[derive(Debug, Clone, PartialEq)]
/// Decoded image uploaded with a notification (`imageFile`).
///
/// Pixels are kept in RGB(A) order. Buffers coming from BGR-ordered sources are reordered
/// when the image is constructed, so the uploaded PNG is never color-swapped.
pub struct InlineImage(DynamicImage);

impl InlineImage {
    /// Wrap an already decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self(image)
    }

    /// Build an image from packed 8-bit BGR pixels (3 bytes per pixel, row-major).
    pub fn from_bgr8(
        width: u32,
        height: u32,
        mut pixels: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let actual = pixels.len();
        check_buffer_len(width, height, 3, actual)?;
        for px in pixels.chunks_exact_mut(3) {
            px.swap(0, 2);
        }
        let buffer = RgbImage::from_raw(width, height, pixels).ok_or(
            ValidationError::InvalidImageBuffer {
                expected: expected_len(width, height, 3),
                actual,
            },
        )?;
        Ok(Self(DynamicImage::ImageRgb8(buffer)))
    }

    /// Build an image from packed 8-bit BGRA pixels (4 bytes per pixel, row-major).
    pub fn from_bgra8(
        width: u32,
        height: u32,
        mut pixels: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let actual = pixels.len();
        check_buffer_len(width, height, 4, actual)?;
        for px in pixels.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        let buffer = RgbaImage::from_raw(width, height, pixels).ok_or(
            ValidationError::InvalidImageBuffer {
                expected: expected_len(width, height, 4),
                actual,
            },
        )?;
        Ok(Self(DynamicImage::ImageRgba8(buffer)))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Borrow the pixels in RGB(A) order.
    pub fn as_image(&self) -> &DynamicImage {
        &self.0
    }

    /// Reject images larger than 2048x2048 pixels.
    pub fn check_dimensions(&self) -> Result<(), ValidationError> {
        check_max_side("imageFile", FULLSIZE_MAX_SIDE, self.width(), self.height())
    }
}

impl From<DynamicImage> for InlineImage {
    fn from(value: DynamicImage) -> Self {
        Self::new(value)
    }
}

fn expected_len(width: u32, height: u32, channels: usize) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(channels)
}

fn check_buffer_len(
    width: u32,
    height: u32,
    channels: usize,
    actual: usize,
) -> Result<(), ValidationError> {
    let expected = expected_len(width, height, channels);
    if expected != actual {
        return Err(ValidationError::InvalidImageBuffer { expected, actual });
    }
    Ok(())
}

pub(crate) fn check_max_side(
    field: &'static str,
    max: u32,
    width: u32,
    height: u32,
) -> Result<(), ValidationError> {
    if width > max || height > max {
        return Err(ValidationError::ImageTooLarge {
            field,
            max,
            width,
            height,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Optional attachment of a notification. At most one is sent per request.
pub enum Attachment {
    #[default]
    None,
    /// Image uploaded as a PNG file part.
    Image(InlineImage),
    /// Pair of publicly reachable JPEG URLs; LINE fetches them itself.
    RemoteImage { thumbnail: String, fullsize: String },
    /// Sticker from the LINE sticker catalog.
    Sticker { package_id: i64, sticker_id: i64 },
}

impl Attachment {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Image(_) => "image",
            Self::RemoteImage { .. } => "remote_image",
            Self::Sticker { .. } => "sticker",
        }
    }
}

impl From<InlineImage> for Attachment {
    fn from(value: InlineImage) -> Self {
        Self::Image(value)
    }
}

impl From<DynamicImage> for Attachment {
    fn from(value: DynamicImage) -> Self {
        Self::Image(InlineImage::new(value))
    }
}

impl From<(i64, i64)> for Attachment {
    fn from((package_id, sticker_id): (i64, i64)) -> Self {
        Self::Sticker {
            package_id,
            sticker_id,
        }
    }
}

impl From<(String, String)> for Attachment {
    fn from((thumbnail, fullsize): (String, String)) -> Self {
        Self::RemoteImage {
            thumbnail,
            fullsize,
        }
    }
}

impl From<(&str, &str)> for Attachment {
    fn from((thumbnail, fullsize): (&str, &str)) -> Self {
        Self::from((thumbnail.to_owned(), fullsize.to_owned()))
    }
}

impl<T: Into<Attachment>> From<Option<T>> for Attachment {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl TryFrom<&serde_json::Value> for Attachment {
    type Error = ValidationError;

    /// Classify a dynamically shaped attachment.
    ///
    /// `null` is no attachment, `[int, int]` a sticker and `[string, string]` a remote image
    /// pair. Everything else is rejected with [`ValidationError::InvalidAttachment`].
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        let pair = match value {
            Value::Null => return Ok(Self::None),
            Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
            _ => return Err(ValidationError::InvalidAttachment),
        };

        match pair {
            (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
                (Some(package_id), Some(sticker_id)) => Ok(Self::Sticker {
                    package_id,
                    sticker_id,
                }),
                _ => Err(ValidationError::InvalidAttachment),
            },
            (Value::String(thumbnail), Value::String(fullsize)) => Ok(Self::RemoteImage {
                thumbnail: thumbnail.clone(),
                fullsize: fullsize.clone(),
            }),
            _ => Err(ValidationError::InvalidAttachment),
        }
    }
}

impl TryFrom<serde_json::Value> for Attachment {
    type Error = ValidationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}
