mod led_panel;
mod status_bar;

pub use led_panel::{halfblock_lines, LedPanelWidget};
pub use status_bar::{PreviewStatus, StatusBarWidget};
