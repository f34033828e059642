use image::RgbImage;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme::Theme;

/// Draws an LED frame one pixel per column, two pixel rows per terminal row
pub struct LedPanelWidget;

impl LedPanelWidget {
    pub fn render(frame: &mut Frame, area: Rect, led: &RgbImage, theme: &Theme) {
        let block = Block::default()
            .style(Style::default().bg(theme.bg0))
            .borders(Borders::NONE);
        frame.render_widget(block, area);

        let lines = halfblock_lines(led, area.width as u32, area.height as u32);
        let panel_width = led.width().min(area.width as u32) as u16;
        let panel_height = lines.len() as u16;

        // Center the panel in the area
        let panel_area = Rect {
            x: area.x + area.width.saturating_sub(panel_width) / 2,
            y: area.y + area.height.saturating_sub(panel_height) / 2,
            width: panel_width,
            height: panel_height,
        };
        frame.render_widget(Paragraph::new(lines), panel_area);
    }

    /// Centered message in place of the panel
    pub fn render_message(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
        let block = Block::default()
            .style(Style::default().bg(theme.bg0))
            .borders(Borders::NONE);
        frame.render_widget(block, area);

        let line = Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(theme.grey1)
                .add_modifier(Modifier::ITALIC),
        ));
        let paragraph = Paragraph::new(line)
            .style(Style::default().bg(theme.bg0))
            .alignment(Alignment::Center);

        // Center vertically
        let centered_area = Rect {
            x: area.x,
            y: area.y + area.height / 2,
            width: area.width,
            height: area.height.min(1),
        };
        frame.render_widget(paragraph, centered_area);
    }
}

/// Convert `led` into halfblock lines, cropped to `max_cols` x `max_rows`.
///
/// Each "▀" cell carries the upper pixel as foreground and the lower pixel
/// as background. An odd last row repeats its pixel in both halves.
pub fn halfblock_lines(led: &RgbImage, max_cols: u32, max_rows: u32) -> Vec<Line<'static>> {
    let width = led.width().min(max_cols);
    let rows = led.height().div_ceil(2).min(max_rows);

    (0..rows)
        .map(|row| {
            let y = row * 2;
            let spans: Vec<Span<'static>> = (0..width)
                .map(|x| {
                    let top = led.get_pixel(x, y);
                    let bottom = if y + 1 < led.height() {
                        led.get_pixel(x, y + 1)
                    } else {
                        top
                    };
                    Span::styled(
                        "▀",
                        Style::default()
                            .fg(Color::Rgb(top[0], top[1], top[2]))
                            .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_halfblock_pairs_rows() {
        let mut led = RgbImage::new(2, 4);
        led.put_pixel(0, 0, Rgb([255, 0, 0]));
        led.put_pixel(0, 1, Rgb([0, 0, 255]));

        let lines = halfblock_lines(&led, 10, 10);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 2);

        let style = lines[0].spans[0].style;
        assert_eq!(style.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(style.bg, Some(Color::Rgb(0, 0, 255)));
    }

    #[test]
    fn test_halfblock_crops_to_area() {
        let led = RgbImage::new(128, 32);
        let lines = halfblock_lines(&led, 80, 10);
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.spans.len() == 80));
    }

    #[test]
    fn test_odd_height_repeats_last_row() {
        let led = RgbImage::from_pixel(1, 3, Rgb([7, 8, 9]));
        let lines = halfblock_lines(&led, 1, 10);
        assert_eq!(lines.len(), 2);
        let style = lines[1].spans[0].style;
        assert_eq!(style.fg, style.bg);
    }
}
