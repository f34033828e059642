//! Strip composition: concatenates tiles, separators and gaps into one wide
//! bitmap.
//!
//! Layout, left to right, for each tile `k`:
//!
//! ```text
//! [item_gap if k > 0] [separator + element_gap if the group changed] tile_k
//! ```
//!
//! The group of the first tile always counts as a change, so a strip starts
//! with its first group's separator when one is available.

use std::collections::HashMap;

use image::{imageops, RgbImage};

use crate::tile::{ContentTile, BACKGROUND};

/// A tile tagged with the group key it belongs to (league, conference, ...)
#[derive(Debug, Clone)]
pub struct GroupedTile {
    pub group: String,
    pub tile: ContentTile,
}

impl GroupedTile {
    pub fn new(group: impl Into<String>, tile: ContentTile) -> Self {
        Self {
            group: group.into(),
            tile,
        }
    }
}

/// The composed scroll strip. Never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    bitmap: RgbImage,
    tile_count: usize,
    separator_count: usize,
}

impl Strip {
    #[inline]
    pub fn total_width(&self) -> u32 {
        self.bitmap.width()
    }

    #[inline]
    pub fn display_height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &RgbImage {
        &self.bitmap
    }

    /// Number of content tiles, separators excluded
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn separator_count(&self) -> usize {
        self.separator_count
    }

    /// Copy `[offset, offset + width)` out of the strip, filling anything past
    /// either end with background.
    pub fn window(&self, offset: i64, width: u32) -> RgbImage {
        let height = self.display_height();
        let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);

        let strip_width = self.total_width() as i64;
        let start = offset.max(0);
        let end = (offset + width as i64).min(strip_width);
        if start >= end {
            return canvas;
        }

        let visible = imageops::crop_imm(
            &self.bitmap,
            start as u32,
            0,
            (end - start) as u32,
            height,
        )
        .to_image();
        imageops::replace(&mut canvas, &visible, start - offset, 0);
        canvas
    }
}

/// Compose `tiles` into a strip.
///
/// Returns [`crate::Error::EmptyContent`] for an empty sequence; a zero-width
/// strip is never produced. Every tile and separator must share the height
/// of the first tile.
pub fn compose(
    tiles: &[GroupedTile],
    item_gap: u32,
    element_gap: u32,
    separators: Option<&HashMap<String, ContentTile>>,
) -> crate::Result<Strip> {
    let Some(first) = tiles.first() else {
        return Err(crate::Error::EmptyContent);
    };
    let height = first.tile.height();

    // Plan placements first so the canvas is allocated once
    let mut placements: Vec<(&ContentTile, u32)> = Vec::with_capacity(tiles.len() * 2);
    let mut cursor: u32 = 0;
    let mut current_group: Option<&str> = None;
    let mut separator_count = 0;

    for (index, item) in tiles.iter().enumerate() {
        if index > 0 {
            cursor += item_gap;
        }

        if current_group != Some(item.group.as_str()) {
            if let Some(separator) = separators.and_then(|map| map.get(&item.group)) {
                check_height(separator, height, &item.group)?;
                placements.push((separator, cursor));
                cursor += separator.width() + element_gap;
                separator_count += 1;
                tracing::debug!(
                    group = %item.group,
                    at_start = current_group.is_none(),
                    "Added separator"
                );
            }
            current_group = Some(item.group.as_str());
        }

        check_height(&item.tile, height, &item.group)?;
        placements.push((&item.tile, cursor));
        cursor += item.tile.width();
    }

    let mut bitmap = RgbImage::from_pixel(cursor, height, BACKGROUND);
    for (tile, x) in placements {
        imageops::replace(&mut bitmap, tile.bitmap(), x as i64, 0);
    }

    Ok(Strip {
        bitmap,
        tile_count: tiles.len(),
        separator_count,
    })
}

fn check_height(tile: &ContentTile, expected: u32, group: &str) -> crate::Result<()> {
    if tile.height() != expected {
        return Err(crate::Error::InvalidTile(format!(
            "tile in group '{}' is {}px tall, strip is {}px",
            group,
            tile.height(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    fn tile(width: u32) -> ContentTile {
        ContentTile::solid(width, 32, RED)
    }

    #[test]
    fn test_empty_content() {
        assert!(matches!(
            compose(&[], 10, 4, None),
            Err(crate::Error::EmptyContent)
        ));
    }

    #[test]
    fn test_separator_before_first_tile_only() {
        let tiles = vec![
            GroupedTile::new("nhl", tile(40)),
            GroupedTile::new("nhl", tile(40)),
            GroupedTile::new("nhl", tile(40)),
        ];
        let mut separators = HashMap::new();
        separators.insert("nhl".to_string(), ContentTile::solid(8, 32, BLUE));

        let strip = compose(&tiles, 10, 4, Some(&separators)).unwrap();
        assert_eq!(strip.total_width(), 8 + 4 + 40 + 10 + 40 + 10 + 40);
        assert_eq!(strip.total_width(), 152);
        assert_eq!(strip.separator_count(), 1);
        assert_eq!(strip.tile_count(), 3);

        // separator, element gap, first tile, item gap
        assert_eq!(*strip.bitmap().get_pixel(7, 0), BLUE);
        assert_eq!(*strip.bitmap().get_pixel(8, 0), BACKGROUND);
        assert_eq!(*strip.bitmap().get_pixel(12, 0), RED);
        assert_eq!(*strip.bitmap().get_pixel(52, 31), BACKGROUND);
        assert_eq!(*strip.bitmap().get_pixel(62, 31), RED);
    }

    #[test]
    fn test_separator_on_group_change() {
        let tiles = vec![
            GroupedTile::new("mlb", tile(20)),
            GroupedTile::new("milb", tile(20)),
            GroupedTile::new("milb", tile(20)),
            GroupedTile::new("mlb", tile(20)),
        ];
        let mut separators = HashMap::new();
        separators.insert("mlb".to_string(), ContentTile::solid(6, 32, BLUE));
        separators.insert("milb".to_string(), ContentTile::solid(5, 32, BLUE));

        let strip = compose(&tiles, 3, 2, Some(&separators)).unwrap();
        // mlb sep, milb sep, mlb sep again
        let expected = 4 * 20 + 3 * 3 + (6 + 2) + (5 + 2) + (6 + 2);
        assert_eq!(strip.total_width(), expected);
        assert_eq!(strip.separator_count(), 3);
    }

    #[test]
    fn test_missing_separator_inserts_nothing() {
        let tiles = vec![
            GroupedTile::new("a", tile(10)),
            GroupedTile::new("b", tile(10)),
        ];
        let separators = HashMap::new();
        let strip = compose(&tiles, 5, 9, Some(&separators)).unwrap();
        assert_eq!(strip.total_width(), 25);
        assert_eq!(strip.separator_count(), 0);
    }

    #[test]
    fn test_height_mismatch_rejected() {
        let tiles = vec![
            GroupedTile::new("a", tile(10)),
            GroupedTile::new("a", ContentTile::solid(10, 16, RED)),
        ];
        assert!(matches!(
            compose(&tiles, 0, 0, None),
            Err(crate::Error::InvalidTile(_))
        ));
    }

    #[test]
    fn test_window_past_end_is_background() {
        let strip = compose(&[GroupedTile::new("a", tile(10))], 0, 0, None).unwrap();

        let window = strip.window(6, 8);
        assert_eq!(window.width(), 8);
        assert_eq!(*window.get_pixel(3, 0), RED);
        assert_eq!(*window.get_pixel(4, 0), BACKGROUND);

        let beyond = strip.window(10, 8);
        assert!(beyond.pixels().all(|p| *p == BACKGROUND));

        let before = strip.window(-4, 8);
        assert_eq!(*before.get_pixel(3, 0), BACKGROUND);
        assert_eq!(*before.get_pixel(4, 0), RED);
    }

    proptest! {
        #[test]
        fn prop_width_matches_layout(
            widths in prop::collection::vec((1u32..60, 0usize..3), 1..12),
            item_gap in 0u32..30,
            element_gap in 0u32..10,
        ) {
            let groups = ["x", "y", "z"];
            let sep_widths = [7u32, 9, 11];
            let mut separators = HashMap::new();
            for (g, w) in groups.iter().zip(sep_widths) {
                separators.insert(g.to_string(), ContentTile::solid(w, 32, BLUE));
            }
            let tiles: Vec<GroupedTile> = widths
                .iter()
                .map(|(w, g)| GroupedTile::new(groups[*g], tile(*w)))
                .collect();

            let mut expected: u32 = widths.iter().map(|(w, _)| *w).sum::<u32>()
                + item_gap * (widths.len() as u32 - 1);
            let mut previous = None;
            for (_, g) in &widths {
                if previous != Some(*g) {
                    expected += sep_widths[*g] + element_gap;
                }
                previous = Some(*g);
            }

            let strip = compose(&tiles, item_gap, element_gap, Some(&separators)).unwrap();
            prop_assert_eq!(strip.total_width(), expected);
        }
    }
}
