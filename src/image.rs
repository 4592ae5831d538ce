use crate::error::PaintError;
use crate::geometry::Size;

/// Packed 32-bit ARGB color, `0xAARRGGBB`, premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(u32);

impl Color {
    pub const fn argb(value: u32) -> Self {
        Self(value)
    }

    /// Opaque color from 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(0xff00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn as_rgba(self) -> [u8; 4] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8, self.alpha()]
    }
}

/// Memory order of the four channels of a pixel, fixed when the image is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Blue in the low byte; a pixel's `u32` value is `0xAARRGGBB`.
    BgraPremul,
    /// Red in the low byte; a pixel's `u32` value is `0xAABBGGRR`.
    RgbaPremul,
}

impl PixelFormat {
    pub fn pack(self, color: Color) -> u32 {
        match self {
            PixelFormat::BgraPremul => color.value(),
            PixelFormat::RgbaPremul => swap_red_blue(color.value()),
        }
    }

    pub fn unpack(self, pixel: u32) -> Color {
        match self {
            PixelFormat::BgraPremul => Color::argb(pixel),
            PixelFormat::RgbaPremul => Color::argb(swap_red_blue(pixel)),
        }
    }
}

fn swap_red_blue(value: u32) -> u32 {
    (value & 0xff00_ff00) | (value >> 16 & 0xff) | (value & 0xff) << 16
}

/// Layout of an image: pixel size, bytes per row and channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDesc {
    pub size: Size,
    pub stride: i32,
    pub format: PixelFormat,
}

impl ImageDesc {
    pub fn tight(size: Size, format: PixelFormat) -> Self {
        Self {
            size,
            stride: size.width.max(0) * 4,
            format,
        }
    }

    /// Index of the first pixel of row `y`.
    pub fn row_base(&self, y: i32) -> usize {
        (y * self.stride / 4) as usize
    }

    pub fn pixel_index(&self, x: i32, y: i32) -> usize {
        self.row_base(y) + x as usize
    }

    /// Number of `u32` cells needed to hold every row.
    pub fn required_len(&self) -> usize {
        if self.size.is_empty() {
            return 0;
        }
        self.row_base(self.size.height - 1) + self.size.width as usize
    }

    fn check(&self) -> Result<(), PaintError> {
        if self.size.is_empty() {
            return Err(PaintError::InvalidBuffer);
        }
        if self.stride % 4 != 0 || self.stride < self.size.width * 4 {
            return Err(PaintError::DescribeFailed);
        }
        Ok(())
    }
}

/// Provider of a writable pixel surface.
pub trait ImageData {
    fn describe(&self) -> Result<ImageDesc, PaintError>;
    fn map(&mut self) -> Result<&mut [u32], PaintError>;
}

/// Owned image with stride-addressed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    desc: ImageDesc,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Allocates a zeroed image with tightly packed rows.
    pub fn new(size: Size) -> Result<Self, PaintError> {
        Self::with_stride(size, size.width.max(0) * 4, PixelFormat::BgraPremul)
    }

    pub fn with_stride(size: Size, stride: i32, format: PixelFormat) -> Result<Self, PaintError> {
        let desc = ImageDesc { size, stride, format };
        desc.check()?;
        let len = desc.required_len();
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| PaintError::AllocationFailed {
                width: size.width,
                height: size.height,
            })?;
        pixels.resize(len, 0);
        Ok(Self { desc, pixels })
    }

    /// Wraps existing storage without checking it; `describe` and `map`
    /// report any inconsistency.
    pub fn from_raw(desc: ImageDesc, pixels: Vec<u32>) -> Self {
        Self { desc, pixels }
    }

    pub fn size(&self) -> Size {
        self.desc.size
    }

    pub fn stride(&self) -> i32 {
        self.desc.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.desc.format
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.desc.size.width || y >= self.desc.size.height {
            return None;
        }
        self.pixels
            .get(self.desc.pixel_index(x, y))
            .map(|&p| self.desc.format.unpack(p))
    }

    /// Writes the image into a tightly packed RGBA8 frame such as the one
    /// `pixels::Pixels::frame_mut` exposes. Rows or columns that do not fit
    /// are dropped.
    pub fn copy_to_rgba(&self, frame: &mut [u8], frame_width: usize) {
        if frame_width == 0 || self.desc.check().is_err() {
            return;
        }
        let width = (self.desc.size.width as usize).min(frame_width);
        for (y, row) in frame
            .chunks_exact_mut(frame_width * 4)
            .take(self.desc.size.height as usize)
            .enumerate()
        {
            let base = self.desc.row_base(y as i32);
            let Some(src) = self.pixels.get(base..base + width) else {
                return;
            };
            for (dst, &pixel) in row.chunks_exact_mut(4).zip(src) {
                dst.copy_from_slice(&self.desc.format.unpack(pixel).as_rgba());
            }
        }
    }
}

impl ImageData for PixelBuffer {
    fn describe(&self) -> Result<ImageDesc, PaintError> {
        self.desc.check()?;
        Ok(self.desc)
    }

    fn map(&mut self) -> Result<&mut [u32], PaintError> {
        if self.pixels.len() < self.desc.required_len() {
            return Err(PaintError::MapFailed);
        }
        Ok(&mut self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_channels() {
        let c = Color::argb(0xfff08080);
        assert_eq!(c.as_rgba(), [0xf0, 0x80, 0x80, 0xff]);
        assert_eq!(Color::new(0x60, 0x60, 0x60), Color::argb(0xff606060));
    }

    #[test]
    fn rgba_format_swaps_red_and_blue() {
        let c = Color::argb(0xff112233);
        assert_eq!(PixelFormat::RgbaPremul.pack(c), 0xff332211);
        assert_eq!(PixelFormat::RgbaPremul.unpack(0xff332211), c);
        assert_eq!(PixelFormat::BgraPremul.pack(c), 0xff112233);
    }

    #[test]
    fn padded_stride_addresses_rows() {
        let buffer = PixelBuffer::with_stride(Size::new(3, 2), 20, PixelFormat::BgraPremul).unwrap();
        let desc = buffer.describe().unwrap();
        assert_eq!(desc.row_base(1), 5);
        assert_eq!(desc.pixel_index(2, 1), 7);
        assert_eq!(buffer.pixels().len(), 8);
    }

    #[test]
    fn empty_and_inconsistent_images_are_rejected() {
        assert_eq!(PixelBuffer::new(Size::ZERO), Err(PaintError::InvalidBuffer));
        assert_eq!(
            PixelBuffer::with_stride(Size::new(4, 4), 8, PixelFormat::BgraPremul),
            Err(PaintError::DescribeFailed)
        );

        let desc = ImageDesc::tight(Size::new(4, 4), PixelFormat::BgraPremul);
        let mut short = PixelBuffer::from_raw(desc, vec![0; 10]);
        assert!(short.describe().is_ok());
        assert_eq!(short.map().err(), Some(PaintError::MapFailed));
    }

    #[test]
    fn copy_to_rgba_unpacks_each_pixel() {
        let desc = ImageDesc {
            size: Size::new(2, 2),
            stride: 12,
            format: PixelFormat::BgraPremul,
        };
        let buffer = PixelBuffer::from_raw(desc, vec![0xff010203, 0xff040506, 0, 0xff0a0b0c, 0xff0d0e0f, 0]);
        let mut frame = vec![0u8; 2 * 2 * 4];
        buffer.copy_to_rgba(&mut frame, 2);
        assert_eq!(
            frame,
            vec![1, 2, 3, 255, 4, 5, 6, 255, 10, 11, 12, 255, 13, 14, 15, 255]
        );
    }

    #[test]
    fn pixel_outside_bounds_is_none() {
        let buffer = PixelBuffer::new(Size::new(2, 2)).unwrap();
        assert_eq!(buffer.pixel(2, 0), None);
        assert_eq!(buffer.pixel(0, -1), None);
        assert_eq!(buffer.pixel(1, 1), Some(Color::argb(0)));
    }
}
