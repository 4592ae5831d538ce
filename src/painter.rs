//! Immediate-mode painter for the lock indicator: a background fill, a round
//! center spot and a triangular needle that points along the last mouse
//! movement.

use log::debug;

use crate::config::MouseLockConfig;
use crate::error::PaintError;
use crate::geometry::{distance, Point, Size};
use crate::image::{Color, ImageData, ImageDesc, PixelBuffer, PixelFormat};

// ============================================================================
// NEEDLE GEOMETRY
// ============================================================================

/// Side of the view center the needle lies on, relative to the center spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn contains(self, x: i64, y: i64, (cx, cy): (i64, i64)) -> bool {
        match self {
            Direction::Left => x < cx,
            Direction::Right => x > cx,
            Direction::Up => y < cy,
            Direction::Down => y > cy,
        }
    }
}

/// Triangle the needle is rasterized from: two base anchors on the rim of
/// the center spot and a tip at `center + movement`.
///
/// Coordinates are kept in `i64` so any `i32` movement or radius stays exact
/// through the edge tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedleShape {
    pub center: (i64, i64),
    pub anchor_1: (i64, i64),
    pub anchor_2: (i64, i64),
    pub vertex: (i64, i64),
    pub direction: Direction,
}

impl NeedleShape {
    pub fn new(center: Point, movement: Point, radius: i32) -> Self {
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let radius = i64::from(radius);
        let vertex = (cx + i64::from(movement.x), cy + i64::from(movement.y));

        let (mut anchor_1, mut anchor_2, direction) =
            if movement.x.unsigned_abs() >= movement.y.unsigned_abs() {
                let direction = if movement.x < 0 {
                    Direction::Left
                } else {
                    Direction::Right
                };
                ((cx, cy - radius), (cx, cy + radius), direction)
            } else {
                let direction = if movement.y < 0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                ((cx + radius, cy), (cx - radius, cy), direction)
            };

        if matches!(direction, Direction::Left | Direction::Up) {
            std::mem::swap(&mut anchor_1, &mut anchor_2);
        }

        Self {
            center: (cx, cy),
            anchor_1,
            anchor_2,
            vertex,
            direction,
        }
    }

    /// Edge tests against both anchor-to-tip edges plus the half-space test
    /// on the tip's side of the center.
    pub fn covers(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let (a1, a2, v) = (self.anchor_1, self.anchor_2, self.vertex);
        let within_bound_1 = (y - a1.1) * (v.0 - a1.0) > (v.1 - a1.1) * (x - a1.0);
        let within_bound_2 = (y - a2.1) * (v.0 - a2.0) < (v.1 - a2.1) * (x - a2.0);
        within_bound_1 && within_bound_2 && self.direction.contains(x, y, self.center)
    }
}

// ============================================================================
// IMAGE ACCESS
// ============================================================================

/// Mapped view of an image, valid for one draw step.
struct Target<'a> {
    desc: ImageDesc,
    data: &'a mut [u32],
}

impl<'a> Target<'a> {
    fn map(image: &'a mut impl ImageData, step: &str) -> Option<Self> {
        let desc = match image.describe() {
            Ok(desc) => desc,
            Err(err) => {
                debug!("{step}: skipping image ({err})");
                return None;
            }
        };
        match image.map() {
            Ok(data) => Some(Self { desc, data }),
            Err(err) => {
                debug!("{step}: skipping image ({err})");
                None
            }
        }
    }

    fn set(&mut self, x: i32, y: i32, pixel: u32) {
        let idx = self.desc.pixel_index(x, y);
        self.data[idx] = pixel;
    }
}

// ============================================================================
// PAINTER
// ============================================================================

/// Paints the mouse-lock indicator. Holds the colors, the spot radius and a
/// cached background scanline sized to the current view.
#[derive(Debug, Clone)]
pub struct Painter {
    background: Color,
    foreground: Color,
    spot_radius: i32,
    background_scanline: Vec<u32>,
    scanline_format: PixelFormat,
}

impl Painter {
    pub fn new(background: Color, foreground: Color, spot_radius: i32) -> Self {
        Self {
            background,
            foreground,
            spot_radius,
            background_scanline: Vec::new(),
            scanline_format: PixelFormat::BgraPremul,
        }
    }

    pub fn from_config(config: &MouseLockConfig) -> Self {
        Self::new(
            config.background_color,
            config.foreground_color,
            config.spot_radius,
        )
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn spot_radius(&self) -> i32 {
        self.spot_radius
    }

    /// Rebuilds the row of background pixels copied by
    /// [`Painter::clear_to_background`].
    pub fn rebuild_scanline(&mut self, width: i32, format: PixelFormat) {
        let pixel = format.pack(self.background);
        self.background_scanline.clear();
        self.background_scanline.resize(width.max(0) as usize, pixel);
        self.scanline_format = format;
    }

    /// Allocates an image of `size` and paints background, center spot and
    /// needle into it, in that order.
    pub fn paint_image(&mut self, size: Size, movement: Point) -> Result<PixelBuffer, PaintError> {
        let mut image = PixelBuffer::new(size)?;
        self.clear_to_background(&mut image);
        self.draw_center_spot(&mut image, self.foreground);
        self.draw_needle(&mut image, self.foreground, movement);
        Ok(image)
    }

    pub fn clear_to_background(&mut self, image: &mut impl ImageData) {
        let Some(mut target) = Target::map(image, "ClearToBackground") else {
            return;
        };
        let desc = target.desc;
        let width = desc.size.width as usize;
        if self.background_scanline.len() != width || self.scanline_format != desc.format {
            self.rebuild_scanline(desc.size.width, desc.format);
        }

        for y in 0..desc.size.height {
            let base = desc.row_base(y);
            target.data[base..base + width].copy_from_slice(&self.background_scanline);
        }
    }

    pub fn draw_center_spot(&self, image: &mut impl ImageData, spot_color: Color) {
        let Some(mut target) = Target::map(image, "DrawCenterSpot") else {
            return;
        };
        let size = target.desc.size;
        let pixel = target.desc.format.pack(spot_color);

        // The ROI is bounded by the size of the spot, plus one pixel.
        let center = size.center();
        let roi_radius = self.spot_radius.saturating_add(1);
        let left_top = Point::new(
            center.x.saturating_sub(roi_radius).max(0),
            center.y.saturating_sub(roi_radius).max(0),
        );
        let right_bottom = Point::new(
            size.width.min(center.x.saturating_add(roi_radius)),
            size.height.min(center.y.saturating_add(roi_radius)),
        );

        for y in left_top.y..right_bottom.y {
            for x in left_top.x..right_bottom.x {
                if distance(Point::new(x, y), center) < self.spot_radius as f32 {
                    target.set(x, y, pixel);
                }
            }
        }
    }

    pub fn draw_needle(&self, image: &mut impl ImageData, needle_color: Color, movement: Point) {
        let Some(mut target) = Target::map(image, "DrawNeedle") else {
            return;
        };

        if distance(movement, Point::ZERO) <= self.spot_radius as f32 {
            return;
        }

        let size = target.desc.size;
        let pixel = target.desc.format.pack(needle_color);
        let center = size.center();
        let shape = NeedleShape::new(center, movement, self.spot_radius);

        // Enclosing box of the tip, inclusive on both ends and clamped to the image.
        let extent_x = i64::from(movement.x.unsigned_abs());
        let extent_y = i64::from(movement.y.unsigned_abs());
        let (cx, cy) = shape.center;
        let x_range = clamp_span(cx - extent_x, cx + extent_x, size.width);
        let y_range = clamp_span(cy - extent_y, cy + extent_y, size.height);

        for y in y_range {
            for x in x_range.clone() {
                if shape.covers(x, y) {
                    target.set(x, y, pixel);
                }
            }
        }
    }
}

/// Clamps the closed span `[low, high]` to the pixel indices `0..len`.
fn clamp_span(low: i64, high: i64, len: i32) -> std::ops::RangeInclusive<i32> {
    let last = i64::from(len) - 1;
    let low = low.max(0);
    let high = high.min(last);
    // Both ends now fit in i32; an empty span yields `1..=0`.
    if low > high {
        return 1..=0;
    }
    low as i32..=high as i32
}

impl Default for Painter {
    fn default() -> Self {
        Self::from_config(&MouseLockConfig::default())
    }
}
