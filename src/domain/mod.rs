//! Domain layer: strong types with validation and invariants (no I/O).

mod attachment;
mod request;
mod response;
mod validation;
mod value;

pub(crate) use attachment::check_max_side;
pub use attachment::{Attachment, InlineImage};
pub use request::{NotifyPayload, PayloadAttachment};
pub use response::Status;
pub use validation::ValidationError;
pub use value::{
    AccessToken, FULLSIZE_MAX_SIDE, ImageRole, ImageUrl, MessageText,
    NOTIFICATION_DISABLED_FIELD, THUMBNAIL_MAX_SIDE, notification_flag_from_json,
};
