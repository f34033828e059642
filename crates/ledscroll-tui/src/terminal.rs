use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use image::RgbImage;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};

use ledscroll_core::DisplayDriver;

use crate::theme::Theme;
use crate::widgets::{LedPanelWidget, PreviewStatus, StatusBarWidget};

/// Terminal preview of the LED panel, drawn with halfblocks.
///
/// Entering puts the terminal in raw mode on the alternate screen; dropping
/// the display restores it.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    width: u32,
    height: u32,
    theme: Theme,
    status: PreviewStatus,
}

impl TerminalDisplay {
    pub fn enter(width: u32, height: u32, theme: Theme) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, SetTitle("ledscroll"))?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            width,
            height,
            theme,
            status: PreviewStatus::default(),
        })
    }

    pub fn set_status(&mut self, status: PreviewStatus) {
        self.status = status;
    }

    /// Show `message` instead of a frame
    pub fn show_message(&mut self, message: &str) -> Result<()> {
        let theme = &self.theme;
        let status = &self.status;
        self.terminal.draw(|frame| {
            let (panel, bar) = split(frame.area());
            LedPanelWidget::render_message(frame, panel, message, theme);
            StatusBarWidget::render(frame, bar, status, theme);
        })?;
        Ok(())
    }

    fn draw_frame(&mut self, led: &RgbImage) -> io::Result<()> {
        let theme = &self.theme;
        let status = &self.status;
        self.terminal.draw(|frame: &mut Frame| {
            let (panel, bar) = split(frame.area());
            LedPanelWidget::render(frame, panel, led, theme);
            StatusBarWidget::render(frame, bar, status, theme);
        })?;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

/// Panel area above a one-line status bar
fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

impl DisplayDriver for TerminalDisplay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &RgbImage) -> ledscroll_core::Result<()> {
        self.draw_frame(frame)
            .map_err(|e| ledscroll_core::Error::Present(e.to_string()))
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::error!("Failed to restore terminal: {}", e);
        }
    }
}
