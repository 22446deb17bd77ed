//! Image sources and the loaders that resolve them into decoded images.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::DynamicImage;
use tracing::debug;

use crate::error::LoadError;

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// An `http://` or `https://` URL.
    Remote(String),
    /// An inline `data:` URI, usually a file the user picked.
    DataUri(String),
    /// A path on the local filesystem.
    File(PathBuf),
}

impl ImageSource {
    /// Classifies a user-supplied location string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qicomposite::source::ImageSource;
    ///
    /// let source = ImageSource::parse("https://example.com/logo.png");
    /// assert_eq!(source, ImageSource::Remote("https://example.com/logo.png".into()));
    /// ```
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("data:") {
            ImageSource::DataUri(location.to_string())
        } else if location.starts_with("http://") || location.starts_with("https://") {
            ImageSource::Remote(location.to_string())
        } else if let Some(path) = location.strip_prefix("file://") {
            ImageSource::File(PathBuf::from(path))
        } else {
            ImageSource::File(PathBuf::from(location))
        }
    }
}

impl From<&str> for ImageSource {
    fn from(location: &str) -> Self {
        ImageSource::parse(location)
    }
}

impl From<String> for ImageSource {
    fn from(location: String) -> Self {
        ImageSource::parse(&location)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Remote(url) => write!(f, "{}", url),
            // Data URIs can be megabytes long; only the media type is useful in logs.
            ImageSource::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or("data:");
                write!(f, "{},…", header)
            }
            ImageSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Decodes the payload of a `data:` URI into raw bytes.
///
/// Both base64 (`;base64,`) and percent-encoded payloads are accepted.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, LoadError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| LoadError::InvalidDataUri("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| LoadError::InvalidDataUri("missing ',' separator".to_string()))?;
    if header.split(';').any(|param| param.eq_ignore_ascii_case("base64")) {
        Ok(STANDARD.decode(payload.trim())?)
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Resolves an [`ImageSource`] into a decoded image.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &ImageSource) -> Result<DynamicImage, LoadError>;
}

/// Loader backed by a shared `reqwest` client for remote sources.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    /// Creates a loader whose remote fetches give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("qicomposite/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpImageLoader { client })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, source: &ImageSource) -> Result<DynamicImage, LoadError> {
        let bytes = match source {
            ImageSource::Remote(url) => self.fetch(url).await?,
            ImageSource::DataUri(uri) => decode_data_uri(uri)?,
            ImageSource::File(path) => tokio::fs::read(path).await?,
        };
        debug!(%source, bytes = bytes.len(), "image fetched");
        Ok(image::load_from_memory(&bytes)?)
    }
}
