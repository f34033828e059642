use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::record::ChannelMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub scroll: ScrollSettings,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub modes: ModesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (logs, snapshots)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Full chain width in pixels
    #[serde(default = "default_display_width")]
    pub width: u32,
    /// Panel height in pixels
    #[serde(default = "default_display_height")]
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
        }
    }
}

/// Scroll settings as they appear in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Scroll speed; pixels/second, or pixels/frame for small values
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f64,
    /// Seconds per frame tick
    #[serde(default = "default_scroll_delay")]
    pub scroll_delay: f64,
    /// Advance a fixed amount per frame instead of by elapsed time
    #[serde(default = "default_true")]
    pub frame_based: bool,
    /// Pixels between consecutive tiles
    #[serde(default = "default_gap_between_games", alias = "item_gap")]
    pub gap_between_games: i64,
    /// Pixels after a league separator
    #[serde(default)]
    pub element_gap: i64,
    /// Insert league separator icons when the league changes
    #[serde(default = "default_true")]
    pub show_league_separators: bool,
    /// Width of a game card before padding
    #[serde(default = "default_game_card_width")]
    pub game_card_width: u32,
    /// Black padding on each side of a game card
    #[serde(default = "default_card_padding")]
    pub card_padding: i64,
    /// Fixed duration used when dynamic duration is disabled
    #[serde(default = "default_display_duration")]
    pub display_duration: f64,
    /// Seconds between progress/FPS log lines
    #[serde(default = "default_log_interval")]
    pub log_interval_secs: f64,
    #[serde(default)]
    pub dynamic_duration: DynamicDurationConfig,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            scroll_speed: default_scroll_speed(),
            scroll_delay: default_scroll_delay(),
            frame_based: default_true(),
            gap_between_games: default_gap_between_games(),
            element_gap: 0,
            show_league_separators: default_true(),
            game_card_width: default_game_card_width(),
            card_padding: default_card_padding(),
            display_duration: default_display_duration(),
            log_interval_secs: default_log_interval(),
            dynamic_duration: DynamicDurationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicDurationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,
    /// Extra fraction added on top of the computed scroll time
    #[serde(default = "default_buffer")]
    pub buffer: f64,
}

impl Default for DynamicDurationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            buffer: default_buffer(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON file with normalized game records
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Seconds between record refreshes (0 = load once)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Minimum seconds between repeated "no data" warnings
    #[serde(default = "default_warning_cooldown")]
    pub warning_cooldown_secs: u64,
    /// Directory of `<league>.png` separator icons
    #[serde(default)]
    pub separators_dir: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            refresh_interval_secs: default_refresh_interval(),
            warning_cooldown_secs: default_warning_cooldown(),
            separators_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesConfig {
    /// Channels in rotation order
    #[serde(default = "default_rotation")]
    pub rotation: Vec<ChannelMode>,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            rotation: default_rotation(),
        }
    }
}

/// Resolved scroll parameters for one prepared strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    pub speed_value: f64,
    pub speed_is_frame_based: bool,
    pub delay_seconds: f64,
    pub dynamic_duration: bool,
    pub fixed_duration: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    pub buffer_fraction: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollSettings::default().scroll_config()
    }
}

impl ScrollSettings {
    /// Build the immutable scroll parameters used by the engine
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig {
            speed_value: self.scroll_speed,
            speed_is_frame_based: self.frame_based,
            delay_seconds: self.scroll_delay,
            dynamic_duration: self.dynamic_duration.enabled,
            fixed_duration: self.display_duration,
            min_duration: self.dynamic_duration.min_duration,
            max_duration: self.dynamic_duration.max_duration,
            buffer_fraction: self.dynamic_duration.buffer,
        }
    }

    pub fn item_gap(&self) -> u32 {
        clamp_px(self.gap_between_games)
    }

    pub fn element_gap(&self) -> u32 {
        clamp_px(self.element_gap)
    }

    pub fn card_padding(&self) -> u32 {
        clamp_px(self.card_padding)
    }
}

/// Longest planned or fixed cycle duration accepted from a config file
pub const MAX_DURATION_SECS: f64 = 86_400.0;
pub const MAX_LOG_INTERVAL_SECS: f64 = 3_600.0;
pub const MAX_SCROLL_DELAY: f64 = 1.0;

/// Clamp a duration setting into [0, MAX_DURATION_SECS]; NaN becomes 0
fn cap_seconds(name: &str, value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        return 0.0;
    }
    if value > MAX_DURATION_SECS {
        tracing::warn!("{} = {} too large, using {}", name, value, MAX_DURATION_SECS);
        return MAX_DURATION_SECS;
    }
    value
}

fn clamp_px(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ledscroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_display_width() -> u32 {
    128
}

fn default_display_height() -> u32 {
    32
}

fn default_scroll_speed() -> f64 {
    50.0
}

fn default_scroll_delay() -> f64 {
    0.01
}

fn default_gap_between_games() -> i64 {
    24
}

fn default_game_card_width() -> u32 {
    128
}

fn default_card_padding() -> i64 {
    12 // keeps edge logos from being clipped
}

fn default_display_duration() -> f64 {
    30.0
}

fn default_log_interval() -> f64 {
    5.0
}

fn default_min_duration() -> f64 {
    30.0
}

fn default_max_duration() -> f64 {
    300.0
}

fn default_buffer() -> f64 {
    0.2
}

fn default_data_path() -> PathBuf {
    PathBuf::from("games.json")
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_warning_cooldown() -> u64 {
    60
}

fn default_rotation() -> Vec<ChannelMode> {
    vec![ChannelMode::Live, ChannelMode::Recent, ChannelMode::Upcoming]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, falling back to defaults if absent
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let mut config = Self::read_from(path)?;
        config.validate();
        Ok(config)
    }

    /// Like [`load_from`](Self::load_from) but without [`validate`](Self::validate),
    /// for callers that set up logging in between
    pub fn read_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/ledscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("ledscroll")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    pub fn data_path(&self) -> PathBuf {
        expand_tilde(&self.data.path)
    }

    pub fn separators_dir(&self) -> Option<PathBuf> {
        self.data.separators_dir.as_deref().map(expand_tilde)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("ledscroll.log")
    }

    /// Replace out-of-range values with usable ones
    pub fn validate(&mut self) {
        let scroll = &mut self.scroll;
        for (name, value) in [
            ("gap_between_games", &mut scroll.gap_between_games),
            ("element_gap", &mut scroll.element_gap),
            ("card_padding", &mut scroll.card_padding),
        ] {
            if *value < 0 {
                tracing::warn!("scroll.{} is negative ({}), using 0", name, value);
                *value = 0;
            }
        }

        if !scroll.scroll_delay.is_finite()
            || scroll.scroll_delay <= 0.0
            || scroll.scroll_delay > MAX_SCROLL_DELAY
        {
            tracing::warn!(
                "scroll.scroll_delay {} outside (0, {}], using {}",
                scroll.scroll_delay,
                MAX_SCROLL_DELAY,
                default_scroll_delay()
            );
            scroll.scroll_delay = default_scroll_delay();
        }
        scroll.display_duration = cap_seconds("display_duration", scroll.display_duration);

        let dd = &mut scroll.dynamic_duration;
        dd.min_duration = cap_seconds("min_duration", dd.min_duration);
        dd.max_duration = cap_seconds("max_duration", dd.max_duration);
        if dd.min_duration > dd.max_duration {
            tracing::warn!(
                "dynamic_duration bounds inverted ({} > {}), swapping",
                dd.min_duration,
                dd.max_duration
            );
            std::mem::swap(&mut dd.min_duration, &mut dd.max_duration);
        }
        if !dd.buffer.is_finite() || dd.buffer < 0.0 {
            dd.buffer = 0.0;
        }
        if !scroll.log_interval_secs.is_finite() || scroll.log_interval_secs <= 0.0 {
            scroll.log_interval_secs = default_log_interval();
        }
        if scroll.log_interval_secs > MAX_LOG_INTERVAL_SECS {
            tracing::warn!(
                "scroll.log_interval_secs {} too large, using {}",
                scroll.log_interval_secs,
                MAX_LOG_INTERVAL_SECS
            );
            scroll.log_interval_secs = MAX_LOG_INTERVAL_SECS;
        }

        if scroll.game_card_width == 0 {
            scroll.game_card_width = default_game_card_width();
        }

        if self.display.width == 0 {
            self.display.width = default_display_width();
        }
        if self.display.height == 0 {
            self.display.height = default_display_height();
        }
        if self.modes.rotation.is_empty() {
            self.modes.rotation = default_rotation();
        }
    }
}
