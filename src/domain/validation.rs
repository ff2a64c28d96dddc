use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    MessageTooLong {
        max: usize,
        actual: usize,
    },
    InvalidToken,
    InvalidNotificationFlag,
    InvalidAttachment,
    InvalidImageBuffer {
        expected: usize,
        actual: usize,
    },
    ImageTooLarge {
        field: &'static str,
        max: u32,
        width: u32,
        height: u32,
    },
    InvalidUrl {
        field: &'static str,
        input: String,
    },
    UnsupportedImageExtension {
        field: &'static str,
        input: String,
    },
    ImageNotFound {
        url: String,
        status: u16,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MessageTooLong { max, actual } => {
                write!(f, "message too long: {actual} characters (max {max})")
            }
            Self::InvalidToken => write!(f, "token contains characters not allowed in a header"),
            Self::InvalidNotificationFlag => write!(f, "notificationDisabled must be a boolean"),
            Self::InvalidAttachment => write!(f, "Invalid type of attachment"),
            Self::InvalidImageBuffer { expected, actual } => {
                write!(
                    f,
                    "image buffer has {actual} bytes (expected {expected} for its dimensions)"
                )
            }
            Self::ImageTooLarge {
                field,
                max,
                width,
                height,
            } => write!(
                f,
                "{field} is {width}x{height}px (maximum size {max}x{max}px)"
            ),
            Self::InvalidUrl { field, input } => write!(f, "{field} is not a valid URL: {input}"),
            Self::UnsupportedImageExtension { field, input } => {
                write!(f, "{field} must point to a *.jpg or *.jpeg image: {input}")
            }
            Self::ImageNotFound { url, status } => {
                write!(f, "image URL not found: {url} (HTTP {status})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
