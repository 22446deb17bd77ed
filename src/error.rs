//! Error types for loading, compositing, and configuration.

use thiserror::Error;

/// Failure to fetch or decode a single image source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed data URI: {0}")]
    InvalidDataUri(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("could not read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors a composite build can end with.
///
/// Only [`CompositeError::BaseImageLoad`] and [`CompositeError::Encode`] are ever returned by
/// [`crate::composite::CompositeBuilder::build`]. A logo that fails to load is reported as
/// [`CompositeError::LogoImageLoad`] in the logs and the build carries on without it.
#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("base image could not be loaded: {0}")]
    BaseImageLoad(#[source] LoadError),

    #[error("logo image could not be loaded: {0}")]
    LogoImageLoad(#[source] LoadError),

    #[error("could not encode composite as PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Rejected [`crate::composite::CompositeRequest`] construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("canvas size must be greater than zero")]
    ZeroCanvas,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid hex color: {0}")]
    Color(String),

    #[error("unknown frame shape: {0}")]
    Shape(String),

    #[error("unknown QR type: {0}")]
    QrType(String),

    #[error("unknown rotation: {0}")]
    Rotation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment configuration: {0}")]
    Env(#[from] serde_env::Error),

    #[error("QICOMPOSITE_CANVAS_SIZE must be greater than zero")]
    ZeroCanvas,

    #[error("QICOMPOSITE_HTTP_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}
