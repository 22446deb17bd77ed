//! The composite image builder.
//!
//! A build takes one immutable [`CompositeRequest`], loads the base code image and the
//! optional logo concurrently, and draws them onto a fresh [`RasterSurface`]:
//!
//! 1. the surface is filled with the request background,
//! 2. the base image is stretched over the whole surface,
//! 3. if the code kind supports an overlay and a logo loaded, a white frame in the selected
//!    [`FrameShape`] is filled behind the centered logo area, and the logo is drawn clipped to
//!    the same shape,
//! 4. the surface is encoded as PNG.
//!
//! The base image is mandatory and its failure fails the build. The logo is decoration: if it
//! cannot be loaded the build still succeeds with the base image alone.

use std::fmt;

use image::{DynamicImage, Rgba};
use tracing::{debug, instrument, warn};

use crate::error::{CompositeError, LoadError, RequestError};
use crate::geometry::{FrameGeometry, FrameShape};
use crate::source::{ImageLoader, ImageSource};
use crate::surface::RasterSurface;

/// The frame behind a logo is always opaque white, whatever the code colors are.
pub const FRAME_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Default canvas edge for downloads and shares.
pub const DEFAULT_CANVAS_SIZE: u32 = 1000;

/// Everything one build needs, captured when the user asks for a download or share.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRequest {
    base_source: ImageSource,
    logo_source: Option<ImageSource>,
    frame_shape: FrameShape,
    canvas_size: u32,
    overlay_supported: bool,
    background: Rgba<u8>,
}

impl CompositeRequest {
    /// Starts a request for a square `canvas_size` composite of `base_source`.
    ///
    /// The request has no logo, a square frame, a white background, and supports overlays.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::ZeroCanvas`] when `canvas_size` is zero.
    pub fn new(base_source: impl Into<ImageSource>, canvas_size: u32) -> Result<Self, RequestError> {
        if canvas_size == 0 {
            return Err(RequestError::ZeroCanvas);
        }
        Ok(CompositeRequest {
            base_source: base_source.into(),
            logo_source: None,
            frame_shape: FrameShape::Square,
            canvas_size,
            overlay_supported: true,
            background: FRAME_BACKGROUND,
        })
    }

    pub fn with_logo(mut self, logo_source: impl Into<ImageSource>) -> Self {
        self.logo_source = Some(logo_source.into());
        self
    }

    pub fn with_frame_shape(mut self, frame_shape: FrameShape) -> Self {
        self.frame_shape = frame_shape;
        self
    }

    /// Linear barcodes never get a logo; pass `false` for them.
    pub fn with_overlay_supported(mut self, overlay_supported: bool) -> Self {
        self.overlay_supported = overlay_supported;
        self
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn base_source(&self) -> &ImageSource {
        &self.base_source
    }

    pub fn logo_source(&self) -> Option<&ImageSource> {
        self.logo_source.as_ref()
    }

    pub fn frame_shape(&self) -> FrameShape {
        self.frame_shape
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    pub fn overlay_supported(&self) -> bool {
        self.overlay_supported
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    /// The logo to draw, if any. Ignored entirely when the overlay is unsupported.
    fn overlay_source(&self) -> Option<&ImageSource> {
        self.logo_source.as_ref().filter(|_| self.overlay_supported)
    }
}

/// Progress of a single build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeStage {
    Idle,
    LoadingBase,
    LoadingLogo,
    Serialized,
    Failed,
}

impl fmt::Display for CompositeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompositeStage::Idle => "idle",
            CompositeStage::LoadingBase => "loading-base",
            CompositeStage::LoadingLogo => "loading-logo",
            CompositeStage::Serialized => "serialized",
            CompositeStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of the optional logo load.
#[derive(Debug)]
enum LogoOutcome {
    Skipped,
    Loaded(DynamicImage),
    Failed(LoadError),
}

impl LogoOutcome {
    fn into_image(self) -> Option<DynamicImage> {
        match self {
            LogoOutcome::Loaded(image) => Some(image),
            LogoOutcome::Skipped => None,
            LogoOutcome::Failed(err) => {
                let err = CompositeError::LogoImageLoad(err);
                warn!(error = %err, "continuing without logo");
                None
            }
        }
    }
}

/// Builds composite PNGs. Holds no per-build state, so one builder can serve any number
/// of concurrent builds.
#[derive(Debug, Clone)]
pub struct CompositeBuilder<L> {
    loader: L,
}

impl<L: ImageLoader> CompositeBuilder<L> {
    pub fn new(loader: L) -> Self {
        CompositeBuilder { loader }
    }

    /// Builds the composite and encodes it as PNG.
    ///
    /// # Errors
    ///
    /// [`CompositeError::BaseImageLoad`] when the base image cannot be fetched or decoded.
    /// A failing logo never produces an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use qicomposite::composite::{CompositeBuilder, CompositeRequest};
    /// use qicomposite::geometry::FrameShape;
    /// use qicomposite::source::HttpImageLoader;
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let builder = CompositeBuilder::new(HttpImageLoader::new(Duration::from_secs(15))?);
    /// let request = CompositeRequest::new("https://api.qrserver.com/v1/create-qr-code/?size=1000x1000&data=hi", 1000)?
    ///     .with_logo("https://cdn-icons-png.flaticon.com/512/733/733547.png")
    ///     .with_frame_shape(FrameShape::Circle);
    /// let _png = builder.build(&request).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(canvas_size = request.canvas_size(), shape = %request.frame_shape()))]
    pub async fn build(&self, request: &CompositeRequest) -> Result<Vec<u8>, CompositeError> {
        let surface = self.compose(request).await?;
        let png = surface.into_png().map_err(CompositeError::Encode)?;
        debug!(stage = %CompositeStage::Serialized, bytes = png.len());
        Ok(png)
    }

    /// Draws the composite without encoding it.
    pub async fn compose(&self, request: &CompositeRequest) -> Result<RasterSurface, CompositeError> {
        debug!(stage = %CompositeStage::Idle);
        let mut surface = RasterSurface::new(request.canvas_size(), request.background());

        debug!(stage = %CompositeStage::LoadingBase, source = %request.base_source());
        let logo_load = async {
            match request.overlay_source() {
                None => LogoOutcome::Skipped,
                Some(source) => {
                    debug!(stage = %CompositeStage::LoadingLogo, %source);
                    match self.loader.load(source).await {
                        Ok(image) => LogoOutcome::Loaded(image),
                        Err(err) => LogoOutcome::Failed(err),
                    }
                }
            }
        };
        let (base, logo) = tokio::join!(self.loader.load(request.base_source()), logo_load);

        // Only the mandatory layer decides success.
        let base = base.map_err(|err| {
            debug!(stage = %CompositeStage::Failed);
            CompositeError::BaseImageLoad(err)
        })?;
        surface.draw_stretched(&base);

        if let Some(logo) = logo.into_image() {
            draw_logo(&mut surface, &logo, request.frame_shape());
        }
        Ok(surface)
    }
}

/// Fills the padded white frame and draws the logo clipped to the unpadded shape.
fn draw_logo(surface: &mut RasterSurface, logo: &DynamicImage, shape: FrameShape) {
    let geometry = FrameGeometry::for_canvas(surface.size());
    if geometry.logo.is_empty() {
        return;
    }
    let frame = shape.clip_path(geometry.frame(), geometry.canvas_size);
    surface.fill_path(&frame, FRAME_BACKGROUND);
    let clip = shape.clip_path(geometry.logo, geometry.canvas_size);
    surface.draw_clipped(logo, &clip);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use async_trait::async_trait;
    use image::RgbaImage;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    const BASE: &str = "https://codes.test/base.png";
    const LOGO: &str = "https://codes.test/logo.png";
    const BROKEN: &str = "https://codes.test/broken.png";

    /// Serves fixed images from memory and counts every load.
    struct MemoryLoader {
        images: HashMap<String, DynamicImage>,
        loads: AtomicUsize,
    }

    impl MemoryLoader {
        fn new() -> Self {
            let mut images = HashMap::new();
            images.insert(BASE.to_string(), checkerboard(50));
            images.insert(
                LOGO.to_string(),
                DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, BLUE)),
            );
            MemoryLoader {
                images,
                loads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageLoader for MemoryLoader {
        async fn load(&self, source: &ImageSource) -> Result<DynamicImage, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.images
                .get(&source.to_string())
                .cloned()
                .ok_or_else(|| LoadError::Status {
                    url: source.to_string(),
                    status: 404,
                })
        }
    }

    fn checkerboard(size: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(size, size, |x, y| {
            if (x / 5 + y / 5) % 2 == 0 {
                BLACK
            } else {
                WHITE
            }
        }))
    }

    fn builder() -> CompositeBuilder<MemoryLoader> {
        CompositeBuilder::new(MemoryLoader::new())
    }

    async fn base_only(size: u32) -> RgbaImage {
        let request = CompositeRequest::new(BASE, size).unwrap();
        builder().compose(&request).await.unwrap().as_image().clone()
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        assert_eq!(CompositeRequest::new(BASE, 0), Err(RequestError::ZeroCanvas));
    }

    #[tokio::test]
    async fn test_base_only_is_scaled_base() {
        let composed = base_only(100).await;
        let mut expected = RasterSurface::new(100, WHITE);
        expected.draw_stretched(&checkerboard(50));
        assert_eq!(&composed, expected.as_image());
    }

    #[tokio::test]
    async fn test_logo_changes_only_padded_frame() {
        let request = CompositeRequest::new(BASE, 1000)
            .unwrap()
            .with_logo(LOGO)
            .with_frame_shape(FrameShape::rounded());
        let with_logo = builder().compose(&request).await.unwrap();
        let plain = base_only(1000).await;

        let frame = FrameGeometry::for_canvas(1000).frame();
        let mut changed = 0;
        for (x, y, pixel) in with_logo.as_image().enumerate_pixels() {
            if pixel != plain.get_pixel(x, y) {
                changed += 1;
                assert!(
                    x >= frame.x && x < frame.right() && y >= frame.y && y < frame.bottom(),
                    "pixel ({}, {}) changed outside the frame",
                    x,
                    y
                );
            }
        }
        assert!(changed > 0);
    }

    #[tokio::test]
    async fn test_circle_scenario_at_reference_size() {
        let request = CompositeRequest::new(BASE, 1000)
            .unwrap()
            .with_logo(LOGO)
            .with_frame_shape(FrameShape::Circle);
        let surface = builder().compose(&request).await.unwrap();
        let img = surface.as_image();

        let logo_disk = FrameShape::Circle.clip_path(Rect::new(380, 380, 240, 240), 1000);
        let frame_disk = FrameShape::Circle.clip_path(Rect::new(360, 360, 280, 280), 1000);
        for y in 360..640 {
            for x in 360..640 {
                let pixel = *img.get_pixel(x, y);
                if logo_disk.contains(x, y) {
                    assert_eq!(pixel, BLUE, "logo pixel ({}, {})", x, y);
                } else if frame_disk.contains(x, y) {
                    assert_eq!(pixel, WHITE, "frame pixel ({}, {})", x, y);
                } else {
                    assert_ne!(pixel, BLUE, "corner pixel ({}, {})", x, y);
                }
            }
        }
        // A point on the ring, 130px right of center, lies between the two radii.
        assert_eq!(*img.get_pixel(630, 500), WHITE);
        assert_eq!(*img.get_pixel(500, 500), BLUE);
    }

    #[tokio::test]
    async fn test_unsupported_overlay_ignores_logo() {
        let loader = MemoryLoader::new();
        let builder = CompositeBuilder::new(loader);
        let request = CompositeRequest::new(BASE, 200)
            .unwrap()
            .with_logo(LOGO)
            .with_overlay_supported(false);
        let composed = builder.compose(&request).await.unwrap();
        assert_eq!(composed.as_image(), &base_only(200).await);
        assert_eq!(builder.loader.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_logo_falls_back_to_base() {
        let request = CompositeRequest::new(BASE, 200)
            .unwrap()
            .with_logo(BROKEN)
            .with_frame_shape(FrameShape::Circle);
        let png = builder().build(&request).await.unwrap();
        let plain = CompositeRequest::new(BASE, 200).unwrap();
        assert_eq!(png, builder().build(&plain).await.unwrap());
    }

    #[tokio::test]
    async fn test_failing_base_is_an_error() {
        let request = CompositeRequest::new(BROKEN, 200).unwrap().with_logo(LOGO);
        let err = builder().build(&request).await.unwrap_err();
        assert!(matches!(
            err,
            CompositeError::BaseImageLoad(LoadError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_repeated_builds_are_identical() {
        let request = CompositeRequest::new(BASE, 300)
            .unwrap()
            .with_logo(LOGO)
            .with_frame_shape(FrameShape::rounded());
        let builder = builder();
        let first = builder.build(&request).await.unwrap();
        let second = builder.build(&request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(builder.loader.loads.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_background_shows_through_transparent_base() {
        let mut loader = MemoryLoader::new();
        loader.images.insert(
            BASE.to_string(),
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]))),
        );
        let request = CompositeRequest::new(BASE, 16)
            .unwrap()
            .with_background(Rgba([1, 2, 3, 255]));
        let surface = CompositeBuilder::new(loader).compose(&request).await.unwrap();
        assert!(surface.as_image().pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }
}
