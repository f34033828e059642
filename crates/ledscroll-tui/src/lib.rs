pub mod event;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use event::{is_quit_key, AppEvent, EventHandler};
pub use terminal::TerminalDisplay;
pub use theme::Theme;
