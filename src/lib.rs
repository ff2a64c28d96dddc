//! Typed, blocking Rust client for the LINE Notify HTTP API.
//!
//! The crate is split into a domain layer of strong types, a transport layer for the
//! wire format (form fields, PNG encoding, rate-limit headers), and a small client layer
//! orchestrating requests.
//!
//! ```rust,no_run
//! use linenotify::{AccessToken, Attachment, LineNotifyClient};
//!
//! fn main() -> Result<(), linenotify::LineNotifyError> {
//!     let client = LineNotifyClient::new(AccessToken::new("...")?);
//!
//!     let status = client.notify("text", Attachment::None, false)?;
//!     println!("{} calls left until {}", status.remaining, status.reset);
//!
//!     client.notify("text & sticker", (446, 1988), false)?;
//!     client.notify(
//!         "text & image url",
//!         ("https://example.com/thumb.jpg", "https://example.com/full.jpg"),
//!         true,
//!     )?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{ErrorKind, LineNotifyClient, LineNotifyClientBuilder, LineNotifyError};
pub use domain::{
    AccessToken, Attachment, ImageRole, ImageUrl, InlineImage, MessageText, NotifyPayload,
    PayloadAttachment, Status, ValidationError,
};
