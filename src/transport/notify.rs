use crate::domain::{MessageText, NOTIFICATION_DISABLED_FIELD, NotifyPayload, PayloadAttachment};

pub const STICKER_PACKAGE_ID_FIELD: &str = "stickerPackageId";
pub const STICKER_ID_FIELD: &str = "stickerId";
pub const IMAGE_FILE_FIELD: &str = "imageFile";
pub const IMAGE_FILE_NAME: &str = "image.png";
pub const IMAGE_FILE_MIME: &str = "image/png";

/// Wire form of a notify request: text fields plus the optional PNG file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyForm {
    pub params: Vec<(String, String)>,
    pub image_file: Option<Vec<u8>>,
}

pub fn encode_notify_form(payload: &NotifyPayload) -> NotifyForm {
    let mut params = vec![
        (
            MessageText::FIELD.to_owned(),
            payload.message().as_str().to_owned(),
        ),
        (
            NOTIFICATION_DISABLED_FIELD.to_owned(),
            payload.notification_disabled().to_string(),
        ),
    ];
    let mut image_file = None;

    match payload.attachment() {
        PayloadAttachment::None => {}
        PayloadAttachment::Sticker {
            package_id,
            sticker_id,
        } => {
            params.push((STICKER_PACKAGE_ID_FIELD.to_owned(), package_id.to_string()));
            params.push((STICKER_ID_FIELD.to_owned(), sticker_id.to_string()));
        }
        PayloadAttachment::ImageUrls {
            thumbnail,
            fullsize,
        } => {
            params.push((
                thumbnail.role().field().to_owned(),
                thumbnail.as_str().to_owned(),
            ));
            params.push((
                fullsize.role().field().to_owned(),
                fullsize.as_str().to_owned(),
            ));
        }
        PayloadAttachment::ImageFile(bytes) => {
            image_file = Some(bytes.clone());
        }
    }

    NotifyForm { params, image_file }
}
