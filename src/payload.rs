//! Logical payload strings for each kind of QR code.
//!
//! The payload is the text the code encodes. It is sent to the rendering service and
//! also used as the clipboard fallback when an image cannot be shared.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Form field values keyed by field name (`ssid`, `pass`, `to`, ...).
pub type PayloadFields = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QrType {
    Text,
    #[default]
    Url,
    VCard,
    Wifi,
    Email,
    Sms,
    Twitter,
    Facebook,
    Bitcoin,
    File,
    App,
}

impl QrType {
    pub const ALL: [QrType; 11] = [
        QrType::Text,
        QrType::Url,
        QrType::VCard,
        QrType::Wifi,
        QrType::Email,
        QrType::Sms,
        QrType::Twitter,
        QrType::Facebook,
        QrType::Bitcoin,
        QrType::File,
        QrType::App,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QrType::Text => "text",
            QrType::Url => "url",
            QrType::VCard => "vcard",
            QrType::Wifi => "wifi",
            QrType::Email => "email",
            QrType::Sms => "sms",
            QrType::Twitter => "twitter",
            QrType::Facebook => "facebook",
            QrType::Bitcoin => "bitcoin",
            QrType::File => "file",
            QrType::App => "app",
        }
    }
}

impl fmt::Display for QrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        QrType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ParseError::QrType(s.to_string()))
    }
}

/// Builds the payload for `kind` from the submitted `fields`. Missing fields are empty.
///
/// # Example
///
/// ```rust
/// use qicomposite::payload::{build_payload, PayloadFields, QrType};
///
/// let mut fields = PayloadFields::new();
/// fields.insert("num".into(), "01700000000".into());
/// fields.insert("msg".into(), "hi".into());
/// assert_eq!(build_payload(QrType::Sms, &fields), "smsto:01700000000:hi");
/// ```
pub fn build_payload(kind: QrType, fields: &PayloadFields) -> String {
    let field = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");
    match kind {
        QrType::VCard => format!(
            "BEGIN:VCARD\nVERSION:3.0\nN:{}\nTEL:{}\nEMAIL:{}\nEND:VCARD",
            field("name"),
            field("phone"),
            field("email")
        ),
        QrType::Wifi => {
            let encryption = match field("enc") {
                "" => "WPA",
                enc => enc,
            };
            format!("WIFI:S:{};T:{};P:{};;", field("ssid"), encryption, field("pass"))
        }
        QrType::Email => format!(
            "mailto:{}?subject={}&body={}",
            field("to"),
            urlencoding::encode(field("sub")),
            urlencoding::encode(field("body"))
        ),
        QrType::Sms => format!("smsto:{}:{}", field("num"), field("msg")),
        QrType::Bitcoin => format!("bitcoin:{}?amount={}", field("addr"), field("amt")),
        QrType::Twitter => format!("https://twitter.com/{}", field("user")),
        QrType::Text | QrType::Url | QrType::Facebook | QrType::File | QrType::App => {
            field("val").to_string()
        }
    }
}
