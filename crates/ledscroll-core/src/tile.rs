//! Fixed-height content tiles
//!
//! A tile is one pre-rendered unit of content (game card, standings row,
//! separator icon). Tiles are immutable once built.

use image::{imageops, Rgb, RgbImage};

/// Opaque black fill used for gaps and out-of-strip regions
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, PartialEq)]
pub struct ContentTile {
    bitmap: RgbImage,
}

impl ContentTile {
    /// Wrap a rendered bitmap; rejects zero-sized images
    pub fn new(bitmap: RgbImage) -> crate::Result<Self> {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(crate::Error::InvalidTile(format!(
                "tile must be non-empty, got {}x{}",
                bitmap.width(),
                bitmap.height()
            )));
        }
        Ok(Self { bitmap })
    }

    /// Single-color tile, at least 1x1
    pub fn solid(width: u32, height: u32, color: Rgb<u8>) -> Self {
        Self {
            bitmap: RgbImage::from_pixel(width.max(1), height.max(1), color),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &RgbImage {
        &self.bitmap
    }

    pub fn into_bitmap(self) -> RgbImage {
        self.bitmap
    }

    /// Copy of this tile with `padding` black columns on each side
    pub fn padded(&self, padding: u32) -> Self {
        if padding == 0 {
            return self.clone();
        }
        let mut canvas = RgbImage::from_pixel(self.width() + padding * 2, self.height(), BACKGROUND);
        imageops::replace(&mut canvas, &self.bitmap, padding as i64, 0);
        Self { bitmap: canvas }
    }
}
