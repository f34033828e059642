use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use ledscroll_core::scroll::{PlaybackPhase, ScrollInfo};

use crate::theme::Theme;

/// What the status bar shows about the playing channel
#[derive(Debug, Clone, Default)]
pub struct PreviewStatus {
    pub mode: String,
    pub info: Option<ScrollInfo>,
    pub fps: Option<f64>,
    /// Overrides the progress text when set
    pub message: Option<String>,
}

impl PreviewStatus {
    pub fn progress_text(&self) -> String {
        if let Some(msg) = &self.message {
            return format!(" {}", msg);
        }
        let Some(info) = &self.info else {
            return " idle".to_string();
        };

        let fps = self
            .fps
            .map(|f| format!("{:.1} fps", f))
            .unwrap_or_else(|| "-- fps".to_string());
        format!(
            " {:.0}/{}px | {:.1}s/{:.0}s | {}",
            info.position,
            info.total_width + info.display_width,
            info.elapsed_secs,
            info.planned_duration_secs,
            fps
        )
    }

    fn phase_label(&self) -> &'static str {
        match self.info.as_ref().map(|i| i.phase) {
            Some(PlaybackPhase::Running) => "RUNNING",
            Some(PlaybackPhase::Complete) => "COMPLETE",
            Some(PlaybackPhase::Idle) | None => "IDLE",
        }
    }
}

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, status: &PreviewStatus, theme: &Theme) {
        let phase_color = match status.info.as_ref().map(|i| i.phase) {
            Some(PlaybackPhase::Running) => theme.green,
            Some(PlaybackPhase::Complete) => theme.yellow,
            _ => theme.red,
        };

        let badge = format!(" {} {} ", status.mode.to_uppercase(), status.phase_label());
        let progress = status.progress_text();
        let help_hint = " q:quit ";
        let padding_len = area
            .width
            .saturating_sub((badge.chars().count() + progress.chars().count() + help_hint.len()) as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(
                badge,
                Style::default()
                    .fg(theme.bg0)
                    .bg(phase_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(progress, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ScrollInfo {
        ScrollInfo {
            phase: PlaybackPhase::Running,
            position: 40.0,
            total_width: 152,
            display_width: 128,
            velocity_px_per_frame: 0.5,
            elapsed_secs: 0.8,
            planned_duration_secs: 30.0,
            planned_progress: 0.02,
            frame_count: 80,
            complete: false,
        }
    }

    #[test]
    fn test_progress_text() {
        let status = PreviewStatus {
            mode: "live".into(),
            info: Some(info()),
            fps: Some(99.5),
            message: None,
        };
        assert_eq!(status.progress_text(), " 40/280px | 0.8s/30s | 99.5 fps");
        assert_eq!(status.phase_label(), "RUNNING");
    }

    #[test]
    fn test_message_overrides_progress() {
        let status = PreviewStatus {
            message: Some("Waiting for games".into()),
            info: Some(info()),
            ..Default::default()
        };
        assert_eq!(status.progress_text(), " Waiting for games");
    }

    #[test]
    fn test_idle_without_info() {
        let status = PreviewStatus::default();
        assert_eq!(status.progress_text(), " idle");
        assert_eq!(status.phase_label(), "IDLE");
    }
}
