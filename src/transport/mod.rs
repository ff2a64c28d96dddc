//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod image_codec;
mod notify;
mod rate_limit;

pub use image_codec::{decode_image, encode_png, read_dimensions};
pub use notify::{
    IMAGE_FILE_FIELD, IMAGE_FILE_MIME, IMAGE_FILE_NAME, NotifyForm, encode_notify_form,
};
pub use rate_limit::{decode_error_message, decode_rate_limit_headers};
