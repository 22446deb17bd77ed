//! URLs for the remote QR and barcode rendering services.
//!
//! Codes are never encoded locally. A render request describes the code and produces the
//! URL whose response is the base image of a composite.

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::error::ParseError;

pub const DEFAULT_QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_BARCODE_ENDPOINT: &str = "https://bwipjs-api.metafloor.com/";

/// Quiet zone around the rendered QR code, in pixels.
pub const DEFAULT_MARGIN: u32 = 10;

/// An opaque RGB color written as six hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const BLACK: HexColor = HexColor([0, 0, 0]);
    pub const WHITE: HexColor = HexColor([255, 255, 255]);

    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl FromStr for HexColor {
    type Err = ParseError;

    /// Accepts `#rrggbb` or `rrggbb`, in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseError::Color(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseError::Color(s.to_string()))
        };
        Ok(HexColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}

/// Formats without the leading `#`, the way the rendering services expect it.
impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Which family of code is being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeKind {
    Qr,
    /// A linear barcode in the named symbology, e.g. `code128` or `ean13`.
    Barcode { symbology: String },
}

impl CodeKind {
    /// Only square QR codes leave room for a centered logo.
    pub fn supports_overlay(&self) -> bool {
        matches!(self, CodeKind::Qr)
    }
}

/// A QR code as rendered by the qrserver API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRenderRequest {
    pub payload: String,
    pub size: u32,
    pub margin: u32,
    pub foreground: HexColor,
    pub background: HexColor,
}

impl QrRenderRequest {
    pub fn new(payload: impl Into<String>, size: u32) -> Self {
        QrRenderRequest {
            payload: payload.into(),
            size,
            margin: DEFAULT_MARGIN,
            foreground: HexColor::BLACK,
            background: HexColor::WHITE,
        }
    }

    pub fn colors(mut self, foreground: HexColor, background: HexColor) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Builds the GET URL against `endpoint`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qicomposite::render::{QrRenderRequest, DEFAULT_QR_ENDPOINT};
    ///
    /// let url = QrRenderRequest::new("a b", 300).url(DEFAULT_QR_ENDPOINT);
    /// assert_eq!(
    ///     url,
    ///     "https://api.qrserver.com/v1/create-qr-code/?size=300x300&data=a%20b&margin=10&color=000000&bgcolor=ffffff"
    /// );
    /// ```
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}?size={size}x{size}&data={}&margin={}&color={}&bgcolor={}",
            endpoint,
            urlencoding::encode(&self.payload),
            self.margin,
            self.foreground,
            self.background,
            size = self.size,
        )
    }
}

/// Barcode orientation, as understood by bwip-js.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Normal,
    Right,
    Inverted,
    Left,
}

impl Rotation {
    fn code(self) -> char {
        match self {
            Rotation::Normal => 'N',
            Rotation::Right => 'R',
            Rotation::Inverted => 'I',
            Rotation::Left => 'L',
        }
    }
}

impl FromStr for Rotation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORMAL" => Ok(Rotation::Normal),
            "R" | "RIGHT" => Ok(Rotation::Right),
            "I" | "INVERTED" => Ok(Rotation::Inverted),
            "L" | "LEFT" => Ok(Rotation::Left),
            _ => Err(ParseError::Rotation(s.to_string())),
        }
    }
}

/// A linear barcode as rendered by the bwip-js API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeRenderRequest {
    pub payload: String,
    pub symbology: String,
    pub scale: u32,
    pub padding: u32,
    pub rotation: Rotation,
    pub include_text: bool,
    pub foreground: HexColor,
    pub background: HexColor,
}

impl BarcodeRenderRequest {
    pub fn new(payload: impl Into<String>, symbology: impl Into<String>) -> Self {
        BarcodeRenderRequest {
            payload: payload.into(),
            symbology: symbology.into(),
            scale: 3,
            padding: DEFAULT_MARGIN,
            rotation: Rotation::Normal,
            include_text: true,
            foreground: HexColor::BLACK,
            background: HexColor::WHITE,
        }
    }

    pub fn colors(mut self, foreground: HexColor, background: HexColor) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    pub fn url(&self, endpoint: &str) -> String {
        let mut url = format!(
            "{}?bcid={}&text={}&scale={}&padding={}&rotate={}&barcolor={}&backgroundcolor={}",
            endpoint,
            urlencoding::encode(&self.symbology),
            urlencoding::encode(&self.payload),
            self.scale,
            self.padding,
            self.rotation.code(),
            self.foreground,
            self.background,
        );
        if self.include_text {
            url.push_str("&includetext");
        }
        url
    }
}
