//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Local};
use reqwest::blocking::{RequestBuilder, multipart};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::domain::{AccessToken, Attachment, NotifyPayload, Status, ValidationError};
use crate::transport::{
    IMAGE_FILE_FIELD, IMAGE_FILE_MIME, IMAGE_FILE_NAME, NotifyForm, decode_error_message,
    decode_rate_limit_headers, encode_notify_form,
};

mod payload;

#[cfg(test)]
mod fake;

const DEFAULT_NOTIFY_ENDPOINT: &str = "https://notify-api.line.me/api/notify";
const DEFAULT_STATUS_ENDPOINT: &str = "https://notify-api.line.me/api/status";

/// Environment variable read by [`LineNotifyClient::from_env`].
pub const TOKEN_ENV_VAR: &str = "LINENOTIFY_TOKEN";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

trait HttpTransport: Send + Sync {
    fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>>;

    fn post_form(
        &self,
        url: &str,
        authorization: &str,
        form: NotifyForm,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let mut request = self.client.get(url);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, sensitive_header(value)?);
        }
        read_response(request.send()?)
    }

    fn post_form(
        &self,
        url: &str,
        authorization: &str,
        form: NotifyForm,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let request = notify_request(&self.client, url, authorization, form)?;
        read_response(request.send()?)
    }
}

/// `application/x-www-form-urlencoded` without a file, `multipart/form-data` with one.
fn notify_request(
    client: &reqwest::blocking::Client,
    url: &str,
    authorization: &str,
    form: NotifyForm,
) -> Result<RequestBuilder, Box<dyn StdError + Send + Sync>> {
    let request = client
        .post(url)
        .header(AUTHORIZATION, sensitive_header(authorization)?);

    Ok(match form.image_file {
        None => request.form(&form.params),
        Some(bytes) => request.multipart(notify_multipart(form.params, bytes)?),
    })
}

fn notify_multipart(
    params: Vec<(String, String)>,
    image_file: Vec<u8>,
) -> Result<multipart::Form, reqwest::Error> {
    let file = multipart::Part::bytes(image_file)
        .file_name(IMAGE_FILE_NAME)
        .mime_str(IMAGE_FILE_MIME)?;
    Ok(params
        .into_iter()
        .fold(multipart::Form::new(), |body, (key, value)| {
            body.text(key, value)
        })
        .part(IMAGE_FILE_FIELD, file))
}

fn sensitive_header(value: &str) -> Result<HeaderValue, Box<dyn StdError + Send + Sync>> {
    let mut header = HeaderValue::from_str(value)?;
    header.set_sensitive(true);
    Ok(header)
}

fn read_response(
    response: reqwest::blocking::Response,
) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.bytes()?.to_vec();
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Coarse classification of a [`LineNotifyError`].
pub enum ErrorKind {
    /// Caller input violated a documented constraint.
    Validation,
    /// LINE Notify rejected the request and said why.
    RequestFailed,
    /// Anything whose cause could not be classified further.
    Unknown,
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`LineNotifyClient`].
///
/// This error preserves:
/// - validation failures (raised before the request that would carry the bad value),
/// - API-level failures with the message LINE Notify returned,
/// - HTTP, transport, image and response-format failures with their causes.
///
/// Use [`LineNotifyError::kind`] when only the broad class matters.
pub enum LineNotifyError {
    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Non-successful HTTP status with a `message` in the JSON body.
    #[error("request failed with HTTP {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// Non-successful HTTP status without a readable error message.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// A remote image could not be decoded, or an inline image could not be encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A successful response lacked well-formed rate-limit headers.
    #[error("invalid response: {0}")]
    InvalidResponse(#[source] Box<dyn StdError + Send + Sync>),
}

impl LineNotifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::RequestFailed { .. } => ErrorKind::RequestFailed,
            Self::HttpStatus { .. }
            | Self::Transport(_)
            | Self::Image(_)
            | Self::InvalidResponse(_) => ErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`LineNotifyClient`].
///
/// Use this when you need to customize the endpoints, timezone, timeout, or user-agent.
pub struct LineNotifyClientBuilder {
    token: AccessToken,
    notify_endpoint: String,
    status_endpoint: String,
    timezone: Option<FixedOffset>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl LineNotifyClientBuilder {
    /// Create a builder with the default endpoints and the system's local timezone.
    pub fn new(token: AccessToken) -> Self {
        Self {
            token,
            notify_endpoint: DEFAULT_NOTIFY_ENDPOINT.to_owned(),
            status_endpoint: DEFAULT_STATUS_ENDPOINT.to_owned(),
            timezone: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Point both endpoints at another host, e.g. `http://127.0.0.1:8080`.
    ///
    /// `/api/notify` and `/api/status` are appended to `base_url`.
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        self.notify_endpoint = format!("{base}/api/notify");
        self.status_endpoint = format!("{base}/api/status");
        self
    }

    /// Override the endpoint URL for `api/notify`.
    pub fn notify_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.notify_endpoint = endpoint.into();
        self
    }

    /// Override the endpoint URL for `api/status`.
    pub fn status_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.status_endpoint = endpoint.into();
        self
    }

    /// Timezone in which [`Status::reset`] is reported.
    pub fn timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = Some(timezone);
        self
    }

    /// Set an HTTP client timeout applied to every request, image fetches included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`LineNotifyClient`].
    pub fn build(self) -> Result<LineNotifyClient, LineNotifyError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| LineNotifyError::Transport(Box::new(err)))?;

        Ok(LineNotifyClient {
            token: self.token,
            notify_endpoint: self.notify_endpoint,
            status_endpoint: self.status_endpoint,
            timezone: self.timezone.unwrap_or_else(local_timezone),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn local_timezone() -> FixedOffset {
    *Local::now().offset()
}

#[derive(Clone)]
/// High-level LINE Notify client.
///
/// Every call blocks the current thread until LINE Notify answers. A notification with a
/// remote image pair performs up to three requests: one fetch per image to check its size,
/// then the notification itself. By default it uses:
/// - `https://notify-api.line.me/api/notify` for sending notifications
/// - `https://notify-api.line.me/api/status` for checking the rate-limit status
pub struct LineNotifyClient {
    token: AccessToken,
    notify_endpoint: String,
    status_endpoint: String,
    timezone: FixedOffset,
    http: Arc<dyn HttpTransport>,
}

impl LineNotifyClient {
    /// Create a client using the default endpoints and the system's local timezone.
    ///
    /// For more customization, use [`LineNotifyClient::builder`].
    pub fn new(token: AccessToken) -> Self {
        Self {
            token,
            notify_endpoint: DEFAULT_NOTIFY_ENDPOINT.to_owned(),
            status_endpoint: DEFAULT_STATUS_ENDPOINT.to_owned(),
            timezone: local_timezone(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::blocking::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(token: AccessToken) -> LineNotifyClientBuilder {
        LineNotifyClientBuilder::new(token)
    }

    /// Create a client with the token stored in `LINENOTIFY_TOKEN`.
    pub fn from_env() -> Result<Self, LineNotifyError> {
        let token = std::env::var(TOKEN_ENV_VAR).unwrap_or_default();
        Ok(Self::new(AccessToken::new(token)?))
    }

    /// Timezone in which [`Status::reset`] is reported.
    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Validate a notification without sending it.
    ///
    /// Remote image pairs are still downloaded, since their pixel size can only be checked
    /// after a fetch.
    pub fn build_payload(
        &self,
        message: impl Into<String>,
        attachment: impl Into<Attachment>,
        notification_disabled: bool,
    ) -> Result<NotifyPayload, LineNotifyError> {
        payload::build_payload(
            self.http.as_ref(),
            message.into(),
            attachment.into(),
            notification_disabled,
        )
    }

    /// Send a notification to the user or group the token belongs to.
    ///
    /// `attachment` accepts [`Attachment`] or anything convertible into it: an image,
    /// a `(thumbnail_url, fullsize_url)` pair, a `(package_id, sticker_id)` pair, or
    /// `None::<Attachment>`. With `notification_disabled` set, the message is delivered
    /// without a push notification.
    ///
    /// Errors:
    /// - Returns [`LineNotifyError::Validation`] for invalid input; nothing is sent then,
    /// - [`LineNotifyError::RequestFailed`] when LINE Notify rejects the request,
    /// - [`LineNotifyError::InvalidResponse`] when rate-limit headers are missing.
    pub fn notify(
        &self,
        message: impl Into<String>,
        attachment: impl Into<Attachment>,
        notification_disabled: bool,
    ) -> Result<Status, LineNotifyError> {
        let attachment = attachment.into();
        let kind = attachment.kind();
        let payload = self.build_payload(message, attachment, notification_disabled)?;

        debug!(
            endpoint = %self.notify_endpoint,
            attachment = kind,
            notification_disabled,
            "sending notification"
        );
        let response = self
            .http
            .post_form(
                &self.notify_endpoint,
                &self.token.authorization_header(),
                encode_notify_form(&payload),
            )
            .map_err(LineNotifyError::Transport)?;

        parse_response(response, &self.timezone)
    }

    /// Query the current rate-limit status without sending anything.
    pub fn status(&self) -> Result<Status, LineNotifyError> {
        debug!(endpoint = %self.status_endpoint, "checking status");
        let response = self
            .http
            .get(
                &self.status_endpoint,
                Some(&self.token.authorization_header()),
            )
            .map_err(LineNotifyError::Transport)?;

        parse_response(response, &self.timezone)
    }
}

fn parse_response(
    response: HttpResponse,
    timezone: &FixedOffset,
) -> Result<Status, LineNotifyError> {
    if !(200..=299).contains(&response.status) {
        return Err(match decode_error_message(&response.body) {
            Ok(message) => LineNotifyError::RequestFailed {
                status: response.status,
                message,
            },
            Err(err) => {
                warn!(status = response.status, error = %err, "error response has no message");
                let body = String::from_utf8_lossy(&response.body);
                LineNotifyError::HttpStatus {
                    status: response.status,
                    body: (!body.trim().is_empty()).then(|| body.into_owned()),
                }
            }
        });
    }

    decode_rate_limit_headers(&response.headers, timezone)
        .map_err(|err| LineNotifyError::InvalidResponse(Box::new(err)))
}
