//! Owned raster buffers that can cross thread boundaries.
//!
//! Cairo surfaces are reference counted and not `Send`, so anything handed to a
//! background worker (backing image, composited buffer) travels as a [`Bitmap`]
//! and is turned back into a surface where drawing happens.

use std::io::{Read, Write};

use cairo::{Context, Format, ImageSurface};

use crate::error::EngineError;

/// ARGB32 (premultiplied, native endian) pixel buffer in Cairo's layout.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: i32,
    height: i32,
    stride: i32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}

impl Bitmap {
    /// Creates a fully transparent bitmap.
    pub fn new(width: i32, height: i32) -> Result<Self, EngineError> {
        if width <= 0 || height <= 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        let stride = Format::ARgb32.stride_for_width(width as u32)?;
        Ok(Self {
            width,
            height,
            stride,
            data: vec![0; stride as usize * height as usize],
        })
    }

    /// Creates a bitmap filled with a single opaque or translucent color.
    pub fn filled(width: i32, height: i32, color: super::Color) -> Result<Self, EngineError> {
        let mut surface = ImageSurface::create(Format::ARgb32, width, height)?;
        {
            let ctx = Context::new(&surface)?;
            color.apply(&ctx);
            ctx.set_operator(cairo::Operator::Source);
            ctx.paint()?;
        }
        Self::from_surface(&mut surface)
    }

    /// Builds a bitmap from row-major ARGB32 pixel values.
    pub(crate) fn from_argb_pixels(
        width: i32,
        height: i32,
        pixels: impl IntoIterator<Item = u32>,
    ) -> Result<Self, EngineError> {
        let mut bitmap = Self::new(width, height)?;
        let stride = bitmap.stride as usize;
        for (index, px) in pixels.into_iter().take(width as usize * height as usize).enumerate() {
            let y = index / width as usize;
            let x = index % width as usize;
            let offset = y * stride + x * 4;
            bitmap.data[offset..offset + 4].copy_from_slice(&px.to_ne_bytes());
        }
        Ok(bitmap)
    }

    /// Copies the pixels out of an image surface.
    ///
    /// The surface must not be referenced by a live context or pattern.
    pub fn from_surface(surface: &mut ImageSurface) -> Result<Self, EngineError> {
        if surface.format() != Format::ARgb32 {
            let mut converted =
                ImageSurface::create(Format::ARgb32, surface.width(), surface.height())?;
            {
                let ctx = Context::new(&converted)?;
                ctx.set_source_surface(&*surface, 0.0, 0.0)?;
                ctx.set_operator(cairo::Operator::Source);
                ctx.paint()?;
            }
            return Self::from_surface(&mut converted);
        }

        surface.flush();
        let width = surface.width();
        let height = surface.height();
        let stride = surface.stride();
        let data = surface.data()?.to_vec();
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Builds a new Cairo surface holding a copy of these pixels.
    pub fn to_surface(&self) -> Result<ImageSurface, EngineError> {
        Ok(ImageSurface::create_for_data(
            self.data.clone(),
            Format::ARgb32,
            self.width,
            self.height,
            self.stride,
        )?)
    }

    /// Decodes a PNG stream.
    pub fn read_png<R: Read>(reader: &mut R) -> Result<Self, EngineError> {
        let mut surface = ImageSurface::create_from_png(reader)?;
        Self::from_surface(&mut surface)
    }

    /// Encodes the bitmap as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), EngineError> {
        let surface = self.to_surface()?;
        surface.write_to_png(writer)?;
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Raw ARGB32 value at (x, y), or `None` when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.stride + x * 4) as usize;
        let bytes = self.data.get(offset..offset + 4)?;
        Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Alpha channel at (x, y); out-of-bounds pixels read as transparent.
    pub fn alpha(&self, x: i32, y: i32) -> u8 {
        self.pixel(x, y).map_or(0, |px| (px >> 24) as u8)
    }

    /// Iterates over the alpha channel in row-major order.
    pub fn alphas(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| self.alpha(x, y)))
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.alphas().all(|a| a == 0)
    }

    /// Raw bytes, row-major with `stride` bytes per row.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;

    #[test]
    fn new_bitmap_is_transparent() {
        let bitmap = Bitmap::new(8, 4).unwrap();
        assert_eq!(bitmap.dimensions(), (8, 4));
        assert!(bitmap.is_fully_transparent());
        assert_eq!(bitmap.alpha(100, 100), 0);
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            Bitmap::new(0, 10),
            Err(EngineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn filled_bitmap_survives_png_round_trip() {
        let bitmap = Bitmap::filled(6, 3, RED).unwrap();
        let mut png = Vec::new();
        bitmap.write_png(&mut png).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

        let decoded = Bitmap::read_png(&mut png.as_slice()).unwrap();
        assert_eq!(decoded.dimensions(), (6, 3));
        assert_eq!(decoded.pixel(2, 1), Some(0xFFFF_0000));
    }
}
