//! Built-in logos offered next to custom uploads.

use crate::source::ImageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedLogo {
    pub name: &'static str,
    pub url: &'static str,
}

impl PredefinedLogo {
    pub fn source(&self) -> ImageSource {
        ImageSource::Remote(self.url.to_string())
    }
}

pub const PREDEFINED_LOGOS: [PredefinedLogo; 4] = [
    PredefinedLogo {
        name: "LinkedIn",
        url: "https://cdn-icons-png.flaticon.com/512/174/174857.png",
    },
    PredefinedLogo {
        name: "GitHub",
        url: "https://cdn-icons-png.flaticon.com/512/733/733547.png",
    },
    PredefinedLogo {
        name: "WhatsApp",
        url: "https://cdn-icons-png.flaticon.com/512/5968/5968841.png",
    },
    PredefinedLogo {
        name: "Instagram",
        url: "https://cdn-icons-png.flaticon.com/512/2111/2111463.png",
    },
];

/// Looks up a predefined logo by name, ignoring case.
pub fn find(name: &str) -> Option<&'static PredefinedLogo> {
    PREDEFINED_LOGOS
        .iter()
        .find(|logo| logo.name.eq_ignore_ascii_case(name.trim()))
}

/// Resolves a logo argument: a predefined name, or any location [`ImageSource::parse`] accepts.
pub fn resolve(name_or_location: &str) -> ImageSource {
    match find(name_or_location) {
        Some(logo) => logo.source(),
        None => ImageSource::parse(name_or_location),
    }
}
