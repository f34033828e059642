use ratatui::style::Color;

/// Colors for the preview chrome around the LED panel
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg2: Color,
    pub fg0: Color,
    pub grey1: Color,
    pub grey2: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            red: Color::Rgb(0xea, 0x69, 0x62),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            green: Color::Rgb(0xa9, 0xb6, 0x65),
        }
    }
}
