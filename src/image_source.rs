//! Thin adapter over third-party random-image endpoints.
//!
//! Each source answers in one of a few shapes; the adapter turns that into a
//! single image URL or an error for display. Failures never reach the
//! journal. Requests are not cancelled when a newer one starts.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// The endpoint redirects to the image; the final URL is the answer.
    Redirect,
    /// `{ "pics": ["<url>", ...] }`
    JsonPics,
    /// `{ "pic": "<url>" }`
    JsonPic,
    /// `{ "url": "<url>" }`
    JsonDirectUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSource {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub shape: ResponseShape,
}

pub const IMAGE_SOURCES: [ImageSource; 2] = [
    ImageSource {
        name: "random-anime",
        endpoint: "https://www.loliapi.com/bg",
        shape: ResponseShape::Redirect,
    },
    ImageSource {
        name: "nailong-stickers",
        endpoint: "https://oiapi.net/API/FunBoxEmoji/?0=nailong",
        shape: ResponseShape::Redirect,
    },
];

#[derive(Debug, Error)]
pub enum ImageSourceError {
    #[error("unknown image source: {0}")]
    UnknownSource(String),

    #[error("image source responded with status {0}")]
    Status(u16),

    #[error("image request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape from image source (expected {0})")]
    MalformedResponse(&'static str),
}

pub fn find_source(name: &str) -> Result<&'static ImageSource, ImageSourceError> {
    IMAGE_SOURCES
        .iter()
        .find(|source| source.name == name)
        .ok_or_else(|| ImageSourceError::UnknownSource(name.to_string()))
}

pub fn default_source() -> &'static ImageSource {
    &IMAGE_SOURCES[0]
}

/// Append a `t=<ms>` parameter so intermediaries do not serve a cached image.
pub fn cache_busted_url(endpoint: &str, now_ms: i64) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}t={now_ms}")
}

pub fn extract_from_json(shape: ResponseShape, body: &Value) -> Result<String, ImageSourceError> {
    let (found, expected) = match shape {
        ResponseShape::JsonPics => (body.get("pics").and_then(|pics| pics.get(0)), "pics[0]"),
        ResponseShape::JsonPic => (body.get("pic"), "pic"),
        ResponseShape::JsonDirectUrl => (body.get("url"), "url"),
        ResponseShape::Redirect => (None, "a redirect"),
    };
    found
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or(ImageSourceError::MalformedResponse(expected))
}

pub async fn fetch_image_url(
    client: &Client,
    source: &ImageSource,
    now_ms: i64,
) -> Result<String, ImageSourceError> {
    let response = client
        .get(cache_busted_url(source.endpoint, now_ms))
        .send()
        .await?;

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(ImageSourceError::Status(status.as_u16()));
    }

    match source.shape {
        ResponseShape::Redirect => Ok(response.url().to_string()),
        shape => {
            let body: Value = response.json().await?;
            extract_from_json(shape, &body)
        }
    }
}
