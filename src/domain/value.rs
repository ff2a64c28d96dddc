use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// LINE Notify personal access token.
///
/// Invariant: non-empty and made only of tab or printable ASCII bytes, so it can always be
/// placed into an `Authorization` header. The value is kept exactly as given.
pub struct AccessToken(String);

impl AccessToken {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "token";

    /// Create a validated [`AccessToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !value.bytes().all(is_header_byte) {
            return Err(ValidationError::InvalidToken);
        }
        Ok(Self(value))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value for this token (`Bearer <token>`).
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

fn is_header_byte(byte: u8) -> bool {
    byte == b'\t' || (32..=126).contains(&byte)
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Notification message text (`message`).
///
/// Invariant: `1..=1000` characters. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by LINE Notify (`message`).
    pub const FIELD: &'static str = "message";

    /// Maximum number of characters accepted by LINE Notify.
    pub const MAX_CHARS: usize = 1000;

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let chars = value.chars().count();
        if chars == 0 {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::MessageTooLong {
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Form field name used by LINE Notify for the notification flag.
pub const NOTIFICATION_DISABLED_FIELD: &str = "notificationDisabled";

/// Read the notification flag from a dynamically typed value.
///
/// Only JSON booleans are accepted.
pub fn notification_flag_from_json(value: &serde_json::Value) -> Result<bool, ValidationError> {
    value
        .as_bool()
        .ok_or(ValidationError::InvalidNotificationFlag)
}

/// Pixel limit for images uploaded directly or referenced as full size.
pub const FULLSIZE_MAX_SIDE: u32 = 2048;
/// Pixel limit for the thumbnail of a remote image pair.
pub const THUMBNAIL_MAX_SIDE: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which half of a remote image pair a URL is.
pub enum ImageRole {
    Thumbnail,
    Fullsize,
}

impl ImageRole {
    /// Form field name used by LINE Notify for this role.
    pub fn field(self) -> &'static str {
        match self {
            Self::Thumbnail => "imageThumbnail",
            Self::Fullsize => "imageFullsize",
        }
    }

    /// Largest width and height (in pixels) the image may have.
    pub fn max_side(self) -> u32 {
        match self {
            Self::Thumbnail => THUMBNAIL_MAX_SIDE,
            Self::Fullsize => FULLSIZE_MAX_SIDE,
        }
    }
}

static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[\w/:%#\$&\?\(\)~\.=\+\-]+$").expect("static URL pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// URL of a remote JPEG image (`imageThumbnail` / `imageFullsize`).
///
/// Invariant: an HTTP(S) URL whose path ends in `.jpg` or `.jpeg`. Pixel limits can only be
/// checked after the image has been fetched, so they are not part of this type.
pub struct ImageUrl {
    role: ImageRole,
    url: String,
}

impl ImageUrl {
    /// Create a validated image URL for `role`.
    pub fn new(value: impl Into<String>, role: ImageRole) -> Result<Self, ValidationError> {
        let value = value.into();
        let field = role.field();
        if !HTTP_URL.is_match(&value) || url::Url::parse(&value).is_err() {
            return Err(ValidationError::InvalidUrl {
                field,
                input: value,
            });
        }
        if !matches!(path_extension(&value), ".jpg" | ".jpeg") {
            return Err(ValidationError::UnsupportedImageExtension {
                field,
                input: value,
            });
        }
        Ok(Self { role, url: value })
    }

    pub fn role(&self) -> ImageRole {
        self.role
    }

    /// Borrow the URL exactly as provided.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

// Extension of the last path segment, leading dots ignored (`/.jpg` has none).
fn path_extension(input: &str) -> &str {
    let name = input.rsplit('/').next().unwrap_or(input);
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(idx) => &name[stem_start + idx..],
        None => "",
    }
}
