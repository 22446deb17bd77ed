//! Logo frame geometry.
//!
//! All fixed measurements are expressed in thousandths of the canvas edge so that a 1000px
//! canvas maps them one to one: a 240px logo square, 20px of frame padding and a 50px corner
//! radius for rounded frames.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Logo edge length, in thousandths of the canvas edge.
pub const LOGO_SCALE: u32 = 240;

/// Padding between the logo and the outer edge of its white frame.
pub const FRAME_PADDING: u32 = 20;

/// Corner radius used by [`FrameShape::rounded`].
pub const CORNER_RADIUS: u32 = 50;

const REFERENCE_SIZE: u32 = 1000;

/// Scales a reference measurement to a canvas of `canvas_size` pixels, rounding to the
/// nearest pixel.
pub fn scale(units: u32, canvas_size: u32) -> u32 {
    let scaled = (u64::from(units) * u64::from(canvas_size) + u64::from(REFERENCE_SIZE / 2))
        / u64::from(REFERENCE_SIZE);
    scaled as u32
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grows the rectangle by `amount` on every side, clamped at the origin.
    pub fn expand(&self, amount: u32) -> Rect {
        let x = self.x.saturating_sub(amount);
        let y = self.y.saturating_sub(amount);
        Rect {
            x,
            y,
            width: self.x + self.width + amount - x,
            height: self.y + self.height + amount - y,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Shape of the white frame drawn behind a logo and of the clip applied to the logo itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameShape {
    #[default]
    Square,
    /// Rectangle with rounded corners. `radius` is in thousandths of the canvas edge.
    Rounded { radius: u32 },
    Circle,
}

impl FrameShape {
    /// Rounded frame with the standard corner radius.
    pub fn rounded() -> Self {
        FrameShape::Rounded {
            radius: CORNER_RADIUS,
        }
    }

    /// Maps the shape onto a concrete clip path covering `bounds`.
    ///
    /// The same mapping serves both the padded frame fill and the logo clip, so the two can
    /// never disagree about which shape is in use.
    pub fn clip_path(&self, bounds: Rect, canvas_size: u32) -> ClipPath {
        match *self {
            FrameShape::Square => ClipPath::Rect(bounds),
            FrameShape::Rounded { radius } => {
                let max = bounds.width.min(bounds.height) as f32 / 2.0;
                ClipPath::RoundedRect {
                    bounds,
                    radius: (scale(radius, canvas_size) as f32).min(max),
                }
            }
            FrameShape::Circle => {
                let (cx, cy) = bounds.center();
                ClipPath::Disk {
                    cx,
                    cy,
                    radius: bounds.width.min(bounds.height) as f32 / 2.0,
                }
            }
        }
    }
}

impl FromStr for FrameShape {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(FrameShape::Square),
            "rounded" => Ok(FrameShape::rounded()),
            "circle" => Ok(FrameShape::Circle),
            other => Err(ParseError::Shape(other.to_string())),
        }
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameShape::Square => write!(f, "square"),
            FrameShape::Rounded { .. } => write!(f, "rounded"),
            FrameShape::Circle => write!(f, "circle"),
        }
    }
}

/// A resolved region on the canvas. A pixel belongs to the region when its center does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipPath {
    Rect(Rect),
    RoundedRect { bounds: Rect, radius: f32 },
    Disk { cx: f32, cy: f32, radius: f32 },
}

impl ClipPath {
    /// Pixel rectangle that encloses the whole region.
    pub fn bounds(&self) -> Rect {
        match *self {
            ClipPath::Rect(bounds) | ClipPath::RoundedRect { bounds, .. } => bounds,
            ClipPath::Disk { cx, cy, radius } => {
                let x = (cx - radius).floor().max(0.0) as u32;
                let y = (cy - radius).floor().max(0.0) as u32;
                let right = (cx + radius).ceil() as u32;
                let bottom = (cy + radius).ceil() as u32;
                Rect::new(x, y, right - x, bottom - y)
            }
        }
    }

    /// Whether the pixel at column `x`, row `y` falls inside the region.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        match *self {
            ClipPath::Rect(r) => inside_rect(r, px, py),
            ClipPath::RoundedRect { bounds, radius } => {
                if !inside_rect(bounds, px, py) {
                    return false;
                }
                // Distance from the inner rectangle whose corners are the arc centers.
                let left = bounds.x as f32 + radius;
                let right = bounds.right() as f32 - radius;
                let top = bounds.y as f32 + radius;
                let bottom = bounds.bottom() as f32 - radius;
                let dx = px - px.clamp(left, right);
                let dy = py - py.clamp(top, bottom);
                dx * dx + dy * dy <= radius * radius
            }
            ClipPath::Disk { cx, cy, radius } => {
                let dx = px - cx;
                let dy = py - cy;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }
}

fn inside_rect(r: Rect, px: f32, py: f32) -> bool {
    px >= r.x as f32 && px < r.right() as f32 && py >= r.y as f32 && py < r.bottom() as f32
}

/// Logo placement for one canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub canvas_size: u32,
    pub logo_size: u32,
    pub padding: u32,
    /// Unpadded logo bounds, centered on the canvas.
    pub logo: Rect,
}

impl FrameGeometry {
    pub fn for_canvas(canvas_size: u32) -> Self {
        let logo_size = scale(LOGO_SCALE, canvas_size);
        let origin = (canvas_size - logo_size) / 2;
        FrameGeometry {
            canvas_size,
            logo_size,
            padding: scale(FRAME_PADDING, canvas_size),
            logo: Rect::new(origin, origin, logo_size, logo_size),
        }
    }

    /// Logo bounds grown by the frame padding.
    pub fn frame(&self) -> Rect {
        self.logo.expand(self.padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_geometry() {
        let geometry = FrameGeometry::for_canvas(1000);
        assert_eq!(geometry.logo_size, 240);
        assert_eq!(geometry.padding, 20);
        assert_eq!(geometry.logo, Rect::new(380, 380, 240, 240));
        assert_eq!(geometry.frame(), Rect::new(360, 360, 280, 280));
    }

    #[test]
    fn test_scaled_geometry_stays_centered() {
        let geometry = FrameGeometry::for_canvas(300);
        assert_eq!(geometry.logo_size, 72);
        assert_eq!(geometry.padding, 6);
        assert_eq!(geometry.logo.x, 114);
        assert_eq!(geometry.logo.x * 2 + geometry.logo_size, 300);
    }

    #[test]
    fn test_tiny_canvas_has_empty_logo() {
        let geometry = FrameGeometry::for_canvas(1);
        assert!(geometry.logo.is_empty());
    }

    #[test]
    fn test_circle_frame_radius() {
        let geometry = FrameGeometry::for_canvas(1000);
        let frame = FrameShape::Circle.clip_path(geometry.frame(), 1000);
        assert_eq!(
            frame,
            ClipPath::Disk {
                cx: 500.0,
                cy: 500.0,
                radius: 140.0
            }
        );
        assert!(frame.contains(500, 361));
        assert!(!frame.contains(362, 362));
        assert_eq!(frame.bounds(), Rect::new(360, 360, 280, 280));
    }

    #[test]
    fn test_rounded_corners_are_cut() {
        let bounds = Rect::new(0, 0, 200, 200);
        let path = FrameShape::rounded().clip_path(bounds, 1000);
        assert!(!path.contains(0, 0));
        assert!(!path.contains(199, 199));
        assert!(path.contains(100, 0));
        assert!(path.contains(0, 100));
        assert!(path.contains(20, 20));
    }

    #[test]
    fn test_rounded_radius_is_clamped() {
        let bounds = Rect::new(10, 10, 40, 40);
        match (FrameShape::Rounded { radius: 500 }).clip_path(bounds, 1000) {
            ClipPath::RoundedRect { radius, .. } => assert_eq!(radius, 20.0),
            other => panic!("unexpected path {:?}", other),
        }
    }

    #[test]
    fn test_square_covers_bounds_exactly() {
        let path = FrameShape::Square.clip_path(Rect::new(5, 5, 10, 10), 1000);
        assert!(path.contains(5, 5));
        assert!(path.contains(14, 14));
        assert!(!path.contains(15, 14));
        assert!(!path.contains(4, 5));
    }

    #[test]
    fn test_parse_shape() {
        assert_eq!("circle".parse::<FrameShape>(), Ok(FrameShape::Circle));
        assert_eq!("Rounded".parse::<FrameShape>(), Ok(FrameShape::rounded()));
        assert_eq!(" square ".parse::<FrameShape>(), Ok(FrameShape::Square));
        assert!("hexagon".parse::<FrameShape>().is_err());
    }
}
