use crate::domain::value::{ImageUrl, MessageText};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated attachment in the shape LINE Notify expects on the wire.
pub enum PayloadAttachment {
    None,
    /// `stickerPackageId` + `stickerId`.
    Sticker { package_id: i64, sticker_id: i64 },
    /// `imageThumbnail` + `imageFullsize`.
    ImageUrls {
        thumbnail: ImageUrl,
        fullsize: ImageUrl,
    },
    /// PNG bytes sent as the `imageFile` part.
    ImageFile(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully validated body of a `POST /api/notify` request.
pub struct NotifyPayload {
    message: MessageText,
    notification_disabled: bool,
    attachment: PayloadAttachment,
}

impl NotifyPayload {
    pub fn new(
        message: MessageText,
        notification_disabled: bool,
        attachment: PayloadAttachment,
    ) -> Self {
        Self {
            message,
            notification_disabled,
            attachment,
        }
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn notification_disabled(&self) -> bool {
        self.notification_disabled
    }

    pub fn attachment(&self) -> &PayloadAttachment {
        &self.attachment
    }
}
