//! In-memory [`HttpTransport`] used by the client tests.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageFormat};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::{HttpResponse, HttpTransport};
use crate::transport::NotifyForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub authorization: Option<String>,
    pub form: Option<NotifyForm>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<RecordedRequest>,
    responses: HashMap<String, HttpResponse>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for every request to `url`. Unknown URLs fail like a refused connection.
    pub fn respond(self, url: &str, response: HttpResponse) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(url.to_owned(), response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|req| req.url).collect()
    }

    fn record(
        &self,
        request: RecordedRequest,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let mut state = self.state.lock().unwrap();
        let response = state.responses.get(&request.url).cloned();
        state.requests.push(request);
        response.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into()
        })
    }
}

impl HttpTransport for FakeTransport {
    fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        self.record(RecordedRequest {
            method: "GET",
            url: url.to_owned(),
            authorization: authorization.map(str::to_owned),
            form: None,
        })
    }

    fn post_form(
        &self,
        url: &str,
        authorization: &str,
        form: NotifyForm,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        self.record(RecordedRequest {
            method: "POST",
            url: url.to_owned(),
            authorization: Some(authorization.to_owned()),
            form: Some(form),
        })
    }
}

pub(crate) fn response(
    status: u16,
    headers: &[(&str, &str)],
    body: impl Into<Vec<u8>>,
) -> HttpResponse {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    HttpResponse {
        status,
        headers: map,
        body: body.into(),
    }
}

pub(crate) fn rate_limited_ok() -> HttpResponse {
    response(
        200,
        &[
            ("X-RateLimit-Limit", "1000"),
            ("X-RateLimit-ImageLimit", "50"),
            ("X-RateLimit-Remaining", "999"),
            ("X-RateLimit-ImageRemaining", "50"),
            ("X-RateLimit-Reset", "1700000000"),
        ],
        r#"{"status":200,"message":"ok"}"#,
    )
}

pub(crate) fn jpeg(width: u32, height: u32) -> HttpResponse {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    response(200, &[("Content-Type", "image/jpeg")], bytes)
}

/// A 1x1 PNG whose IHDR claims `width` x `height`. Only the header is consistent.
pub(crate) fn png_with_header_size(width: u32, height: u32) -> HttpResponse {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(1, 1)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    // signature (8) + length (4) + "IHDR" (4) + data (13) + crc (4)
    bytes[16..20].copy_from_slice(&width.to_be_bytes());
    bytes[20..24].copy_from_slice(&height.to_be_bytes());
    let crc = crc32(&bytes[12..29]);
    bytes[29..33].copy_from_slice(&crc.to_be_bytes());

    response(200, &[("Content-Type", "image/png")], bytes)
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0_u32;
    for byte in data {
        crc ^= u32::from(*byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}
