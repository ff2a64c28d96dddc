//! Payload assembly: field validation, remote image checks and PNG re-encoding.

use image::DynamicImage;
use tracing::debug;

use super::{HttpTransport, LineNotifyError};
use crate::domain::{
    Attachment, ImageRole, ImageUrl, MessageText, NotifyPayload, PayloadAttachment,
    ValidationError, check_max_side,
};
use crate::transport::{decode_image, encode_png, read_dimensions};

/// Validate every field and produce the payload for `POST /api/notify`.
///
/// The message is checked before the attachment. For a remote image pair the thumbnail is
/// validated (and fetched) before the full size image, and the first failure stops the build.
pub(super) fn build_payload(
    http: &dyn HttpTransport,
    message: String,
    attachment: Attachment,
    notification_disabled: bool,
) -> Result<NotifyPayload, LineNotifyError> {
    let message = MessageText::new(message)?;

    let attachment = match attachment {
        Attachment::None => PayloadAttachment::None,
        Attachment::Image(image) => {
            image.check_dimensions()?;
            PayloadAttachment::ImageFile(encode_png(image.as_image())?)
        }
        Attachment::Sticker {
            package_id,
            sticker_id,
        } => PayloadAttachment::Sticker {
            package_id,
            sticker_id,
        },
        Attachment::RemoteImage {
            thumbnail,
            fullsize,
        } => {
            let thumbnail = validate_remote_image(http, thumbnail, ImageRole::Thumbnail)?;
            let fullsize = validate_remote_image(http, fullsize, ImageRole::Fullsize)?;
            PayloadAttachment::ImageUrls {
                thumbnail,
                fullsize,
            }
        }
    };

    Ok(NotifyPayload::new(message, notification_disabled, attachment))
}

fn validate_remote_image(
    http: &dyn HttpTransport,
    url: String,
    role: ImageRole,
) -> Result<ImageUrl, LineNotifyError> {
    let url = ImageUrl::new(url, role)?;
    fetch_image(http, url.as_str(), role)?;
    Ok(url)
}

/// Download an image, check its size against `role` and make sure it decodes.
///
/// The size comes from the image header, so oversized images are rejected without
/// decoding their pixels. The access token is never sent to image hosts.
fn fetch_image(
    http: &dyn HttpTransport,
    url: &str,
    role: ImageRole,
) -> Result<DynamicImage, LineNotifyError> {
    let response = http.get(url, None).map_err(LineNotifyError::Transport)?;
    if !(200..=299).contains(&response.status) {
        return Err(ValidationError::ImageNotFound {
            url: url.to_owned(),
            status: response.status,
        }
        .into());
    }

    let (width, height) = read_dimensions(&response.body)?;
    debug!(url, width, height, "fetched remote image");
    check_max_side(role.field(), role.max_side(), width, height)?;

    Ok(decode_image(&response.body)?)
}
