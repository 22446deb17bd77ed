//! # qicomposite
//!
//! A Rust library for turning remotely rendered QR codes and barcodes into finished,
//! shareable PNG images with an optional framed logo in the middle.
//!
//! `qicomposite` does not encode codes itself. It builds the request URL for a public
//! rendering service, fetches the result, and composites a logo over it: a white frame in a
//! square, rounded, or circular shape is drawn behind the logo, and the logo is clipped to the
//! same shape.
//!
//! ## Features
//!
//! - Build payloads for URL, text, vCard, WiFi, e-mail, SMS, Bitcoin and social QR codes.
//! - Build rendering URLs for QR codes and linear barcodes with custom colors.
//! - Load images from HTTP(S) URLs, `data:` URIs, or local files.
//! - Overlay a logo in a square, rounded, or circular white frame.
//! - Produce PNG buffers, data URLs, timestamped download files, or share payloads.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qicomposite = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render a QR code with a circular GitHub logo and save it:
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use qicomposite::composite::{CompositeBuilder, CompositeRequest};
//! use qicomposite::geometry::FrameShape;
//! use qicomposite::render::{QrRenderRequest, DEFAULT_QR_ENDPOINT};
//! use qicomposite::source::HttpImageLoader;
//! use qicomposite::{logos, output};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let base = QrRenderRequest::new("https://example.com", 1000).url(DEFAULT_QR_ENDPOINT);
//!     let request = CompositeRequest::new(base, 1000)?
//!         .with_logo(logos::resolve("GitHub"))
//!         .with_frame_shape(FrameShape::Circle);
//!
//!     let builder = CompositeBuilder::new(HttpImageLoader::new(Duration::from_secs(15))?);
//!     let png = builder.build(&request).await?;
//!
//!     let name = output::download_filename("QR Generator BD", chrono::Utc::now());
//!     output::save_png(Path::new("generated"), &name, &png)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`composite`]: The composite image builder.
//! - [`geometry`]: Frame shapes, clip paths and logo placement.
//! - [`surface`]: The RGBA drawing surface.
//! - [`source`]: Image sources and loaders.
//! - [`render`]: Rendering service URLs and colors.
//! - [`payload`]: QR payload strings.
//! - [`logos`]: Predefined logos.
//! - [`output`]: Filenames, saving, data URLs and sharing.
//! - [`config`]: Environment configuration.
//! - [`error`]: Error types.

#![forbid(unsafe_code)]

pub mod composite;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logos;
pub mod output;
pub mod payload;
pub mod render;
pub mod source;
pub mod surface;
