//! League separator icons
//!
//! Icons live in a directory as `<league>.png`. Each is scaled to fit the
//! display height with a 2px margin top and bottom and framed by 4px of
//! black on either side.

use std::collections::HashMap;
use std::path::Path;

use image::{imageops, DynamicImage, Rgba, RgbaImage};

use crate::tile::ContentTile;

/// Horizontal margin on each side of an icon
const SIDE_MARGIN: u32 = 4;
/// Total vertical margin kept free around an icon
const VERTICAL_MARGIN: u32 = 4;

#[derive(Debug, Clone, Default)]
pub struct SeparatorSet {
    icons: HashMap<String, ContentTile>,
}

impl SeparatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.png` in `dir`. Unreadable icons are logged and skipped.
    pub fn load_dir(dir: &Path, display_height: u32) -> crate::Result<Self> {
        let mut set = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_png {
                continue;
            }

            match image::open(&path) {
                Ok(img) => {
                    let tile = separator_tile(&img.to_rgba8(), display_height);
                    tracing::debug!("Loaded {} separator icon: {}x{}", key, tile.width(), tile.height());
                    set.insert(key, tile);
                }
                Err(e) => {
                    tracing::error!("Error loading {} separator icon: {}", key, e);
                }
            }
        }
        tracing::info!("Loaded {} separator icons from {}", set.len(), dir.display());
        Ok(set)
    }

    pub fn insert(&mut self, group: impl Into<String>, tile: ContentTile) {
        self.icons.insert(group.into(), tile);
    }

    pub fn get(&self, group: &str) -> Option<&ContentTile> {
        self.icons.get(group)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, ContentTile> {
        &self.icons
    }
}

/// Frame an icon as a separator tile of `display_height` pixels
pub fn separator_tile(icon: &RgbaImage, display_height: u32) -> ContentTile {
    let max_height = display_height.saturating_sub(VERTICAL_MARGIN).max(1);
    let icon = if icon.height() > max_height {
        let scale = max_height as f64 / icon.height() as f64;
        let width = ((icon.width() as f64 * scale) as u32).max(1);
        imageops::resize(icon, width, max_height, imageops::FilterType::Lanczos3)
    } else {
        icon.clone()
    };

    let width = icon.width() + SIDE_MARGIN * 2;
    let mut canvas = RgbaImage::from_pixel(width, display_height.max(1), Rgba([0, 0, 0, 255]));
    let y_offset = (display_height.saturating_sub(icon.height()) / 2) as i64;
    imageops::overlay(&mut canvas, &icon, SIDE_MARGIN as i64, y_offset);

    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    ContentTile::new(rgb).unwrap_or_else(|_| ContentTile::solid(width, display_height, crate::tile::BACKGROUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_small_icon_is_centered() {
        let icon = RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255]));
        let tile = separator_tile(&icon, 32);
        assert_eq!(tile.width(), 18);
        assert_eq!(tile.height(), 32);
        assert_eq!(*tile.bitmap().get_pixel(3, 16), Rgb([0, 0, 0]));
        assert_eq!(*tile.bitmap().get_pixel(4, 11), Rgb([0, 255, 0]));
        assert_eq!(*tile.bitmap().get_pixel(4, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_tall_icon_is_scaled() {
        let icon = RgbaImage::from_pixel(40, 64, Rgba([255, 255, 255, 255]));
        let tile = separator_tile(&icon, 32);
        // 64 -> 28 tall, 40 * 28/64 = 17 wide, plus margins
        assert_eq!(tile.width(), 17 + 8);
        assert_eq!(tile.height(), 32);
    }

    #[test]
    fn test_transparent_pixels_show_black() {
        let icon = RgbaImage::from_pixel(6, 6, Rgba([255, 0, 0, 0]));
        let tile = separator_tile(&icon, 16);
        assert!(tile.bitmap().pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]))
            .save(dir.path().join("nhl.png"))
            .unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let set = SeparatorSet::load_dir(dir.path(), 32).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("nhl").unwrap().width(), 16);
        assert!(set.get("broken").is_none());
    }
}
