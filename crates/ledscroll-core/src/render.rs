//! Tile rendering strategies
//!
//! A renderer turns one record into one fixed-height tile. Renderers never
//! fail: anything that goes wrong produces a placeholder tile so the
//! composer always receives a full sequence.

use image::{Rgb, RgbImage};

use crate::record::{GameKind, GameRecord, Team};
use crate::tile::{ContentTile, BACKGROUND};

pub trait TileRenderer: Send + Sync {
    /// Render `record` as a tile of [`tile_height`](Self::tile_height) pixels
    fn render_tile(&self, record: &GameRecord, kind: GameKind) -> ContentTile;

    fn tile_height(&self) -> u32;
}

const PLACEHOLDER_RED: Rgb<u8> = Rgb([200, 0, 0]);
const PIP: Rgb<u8> = Rgb([235, 235, 235]);
const PIP_DIM: Rgb<u8> = Rgb([70, 70, 70]);

/// Fallback palette for teams without a configured color
const PALETTE: [Rgb<u8>; 8] = [
    Rgb([200, 16, 46]),
    Rgb([0, 45, 114]),
    Rgb([0, 122, 51]),
    Rgb([253, 181, 21]),
    Rgb([95, 37, 159]),
    Rgb([0, 133, 202]),
    Rgb([243, 112, 33]),
    Rgb([134, 147, 151]),
];

/// Tile shown in place of content that could not be rendered
pub fn placeholder_tile(width: u32, height: u32) -> ContentTile {
    let width = width.max(1);
    let height = height.max(1);
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    for x in 0..width {
        img.put_pixel(x, 0, PLACEHOLDER_RED);
        img.put_pixel(x, height - 1, PLACEHOLDER_RED);
    }
    for y in 0..height {
        img.put_pixel(0, y, PLACEHOLDER_RED);
        img.put_pixel(width - 1, y, PLACEHOLDER_RED);
    }
    // diagonal cross
    let steps = width.max(height);
    let span = (steps - 1).max(1);
    for i in 0..steps {
        let x = i * (width - 1) / span;
        let y = i * (height - 1) / span;
        img.put_pixel(x, y, PLACEHOLDER_RED);
        img.put_pixel(width - 1 - x, y, PLACEHOLDER_RED);
    }
    ContentTile::new(img).unwrap_or_else(|_| ContentTile::solid(width, height, PLACEHOLDER_RED))
}

/// Parse "#rrggbb" or "rrggbb"
pub fn parse_hex_color(value: &str) -> Option<Rgb<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

fn team_color(team: &Team) -> Rgb<u8> {
    team.color
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or_else(|| {
            let index = team
                .abbr
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            PALETTE[index % PALETTE.len()]
        })
}

fn kind_color(kind: GameKind) -> Rgb<u8> {
    match kind {
        GameKind::Live => Rgb([220, 30, 30]),
        GameKind::Recent => Rgb([120, 120, 120]),
        GameKind::Upcoming => Rgb([30, 170, 60]),
    }
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Font-free scoreboard card: team color blocks at the edges, score pips in
/// the middle and a status band colored by game kind.
#[derive(Debug, Clone)]
pub struct CardRenderer {
    card_width: u32,
    height: u32,
    padding: u32,
}

impl CardRenderer {
    pub fn new(card_width: u32, height: u32, padding: u32) -> Self {
        Self {
            card_width,
            height,
            padding,
        }
    }

    fn draw(&self, record: &GameRecord, kind: GameKind) -> crate::Result<ContentTile> {
        let (w, h) = (self.card_width, self.height);
        if w < 16 || h < 8 {
            return Err(crate::Error::InvalidTile(format!(
                "card {}x{} too small to draw",
                w, h
            )));
        }

        let mut img = RgbImage::from_pixel(w, h, BACKGROUND);
        let block_w = w / 4;
        let band_h = (h / 8).max(1);
        let body_h = h - band_h - 1;

        fill_rect(&mut img, 0, 0, block_w, body_h, team_color(&record.away));
        fill_rect(&mut img, w - block_w, 0, block_w, body_h, team_color(&record.home));

        if kind != GameKind::Upcoming {
            let pip = 2;
            let rows = (body_h / (pip + 1)).max(1);
            let center = w / 2;
            self.draw_pips(&mut img, center - 2, rows, pip, record.away.score, true);
            self.draw_pips(&mut img, center + 1, rows, pip, record.home.score, false);
        }

        fill_rect(&mut img, 0, h - band_h, w, band_h, kind_color(kind));
        Ok(ContentTile::new(img)?.padded(self.padding))
    }

    /// Stack `score` pips in columns growing away from `x`
    fn draw_pips(&self, img: &mut RgbImage, x: u32, rows: u32, pip: u32, score: Option<u32>, leftwards: bool) {
        let Some(score) = score else {
            fill_rect(img, x, 0, pip, pip, PIP_DIM);
            return;
        };
        let max_cols = (self.card_width / 4).saturating_sub(2) / (pip + 1);
        for n in 0..score.min(rows * max_cols.max(1)) {
            let col = n / rows;
            let row = n % rows;
            let dx = col * (pip + 1);
            let px = if leftwards { x.saturating_sub(dx + pip - 1) } else { x + dx };
            fill_rect(img, px, row * (pip + 1), pip, pip, PIP);
        }
    }
}

impl TileRenderer for CardRenderer {
    fn render_tile(&self, record: &GameRecord, kind: GameKind) -> ContentTile {
        match self.draw(record, kind) {
            Ok(tile) => tile,
            Err(e) => {
                tracing::error!("Error rendering card for game {}: {}", record.id, e);
                placeholder_tile(self.card_width + self.padding * 2, self.height)
            }
        }
    }

    fn tile_height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(away_score: Option<u32>, home_score: Option<u32>) -> GameRecord {
        GameRecord {
            id: "g1".into(),
            league: "nhl".into(),
            home: Team {
                abbr: "BOS".into(),
                score: home_score,
                color: Some("#ffb81c".into()),
            },
            away: Team {
                abbr: "TOR".into(),
                score: away_score,
                color: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0080"), Some(Rgb([255, 0, 128])));
        assert_eq!(parse_hex_color("00ff00"), Some(Rgb([0, 255, 0])));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn test_card_dimensions_include_padding() {
        let renderer = CardRenderer::new(64, 32, 12);
        let tile = renderer.render_tile(&record(Some(3), Some(2)), GameKind::Recent);
        assert_eq!(tile.width(), 64 + 24);
        assert_eq!(tile.height(), 32);
        // padding column stays black
        assert_eq!(*tile.bitmap().get_pixel(0, 0), BACKGROUND);
        // home block uses the configured color
        assert_eq!(*tile.bitmap().get_pixel(12 + 63, 0), Rgb([255, 184, 28]));
    }

    #[test]
    fn test_status_band_color() {
        let renderer = CardRenderer::new(64, 32, 0);
        let tile = renderer.render_tile(&record(None, None), GameKind::Live);
        assert_eq!(*tile.bitmap().get_pixel(32, 31), kind_color(GameKind::Live));
    }

    #[test]
    fn test_team_color_fallback_is_stable() {
        let team = Team {
            abbr: "TOR".into(),
            score: None,
            color: Some("not-a-color".into()),
        };
        assert_eq!(team_color(&team), team_color(&team));
        assert!(PALETTE.contains(&team_color(&team)));
    }

    #[test]
    fn test_too_small_gives_placeholder() {
        let renderer = CardRenderer::new(4, 4, 2);
        let tile = renderer.render_tile(&record(Some(1), Some(1)), GameKind::Live);
        assert_eq!(tile.width(), 8);
        assert_eq!(tile.height(), 4);
        assert_eq!(*tile.bitmap().get_pixel(0, 0), PLACEHOLDER_RED);
    }

    #[test]
    fn test_large_scores_do_not_overflow_card() {
        let renderer = CardRenderer::new(64, 32, 0);
        let tile = renderer.render_tile(&record(Some(500), Some(500)), GameKind::Recent);
        assert_eq!(tile.width(), 64);
    }
}
