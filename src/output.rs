//! Delivering a finished composite: file downloads, data URLs and shares.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

pub const PNG_MIME: &str = "image/png";

/// Builds a download filename from the application name and a timestamp.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use qicomposite::output::download_filename;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
/// assert_eq!(download_filename("QR Generator BD", at), "qr-generator-bd-1700000000123.png");
/// ```
pub fn download_filename(app_name: &str, at: DateTime<Utc>) -> String {
    let mut slug = String::with_capacity(app_name.len());
    for c in app_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "qr" } else { slug };
    format!("{}-{}.png", slug, at.timestamp_millis())
}

/// Writes `bytes` to `directory/filename`, creating the directory first if needed.
///
/// # Errors
///
/// Returns an `std::io::Error` if the directory cannot be created or the file written.
pub fn save_png(directory: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }
    let path = directory.join(filename);
    fs::write(&path, bytes)?;
    Ok(path)
}

pub fn to_data_url(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", PNG_MIME, STANDARD.encode(bytes))
}

/// What to hand to the platform when the user shares a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    File {
        name: String,
        mime: &'static str,
        bytes: Vec<u8>,
    },
    /// Native sharing is unavailable; copy the code's payload text instead of the image.
    CopyText(String),
}

/// A composite ready to be shared, together with the text it encodes.
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub text: String,
}

impl SharePayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, text: impl Into<String>) -> Self {
        SharePayload {
            file_name: file_name.into(),
            bytes,
            text: text.into(),
        }
    }

    pub fn into_action(self, native_share_available: bool) -> ShareAction {
        if native_share_available {
            ShareAction::File {
                name: self.file_name,
                mime: PNG_MIME,
                bytes: self.bytes,
            }
        } else {
            ShareAction::CopyText(self.text)
        }
    }
}
