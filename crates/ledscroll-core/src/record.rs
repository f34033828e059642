use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which phase of play a record is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Live,
    Recent,
    Upcoming,
}

impl GameKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "live" => Some(Self::Live),
            "recent" => Some(Self::Recent),
            "upcoming" => Some(Self::Upcoming),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameKind::Live => write!(f, "live"),
            GameKind::Recent => write!(f, "recent"),
            GameKind::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// A scroll channel, one per display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    Live,
    Recent,
    Upcoming,
    /// Every kind in one strip
    Mixed,
}

impl ChannelMode {
    pub const ALL: [ChannelMode; 4] = [
        ChannelMode::Live,
        ChannelMode::Recent,
        ChannelMode::Upcoming,
        ChannelMode::Mixed,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ChannelMode::Live => "live",
            ChannelMode::Recent => "recent",
            ChannelMode::Upcoming => "upcoming",
            ChannelMode::Mixed => "mixed",
        }
    }

    /// Kind to assume when a record carries no usable hint
    pub fn fallback_kind(&self) -> GameKind {
        match self {
            ChannelMode::Live => GameKind::Live,
            ChannelMode::Recent => GameKind::Recent,
            ChannelMode::Upcoming | ChannelMode::Mixed => GameKind::Upcoming,
        }
    }

    pub fn accepts(&self, kind: GameKind) -> bool {
        match self {
            ChannelMode::Mixed => true,
            ChannelMode::Live => kind == GameKind::Live,
            ChannelMode::Recent => kind == GameKind::Recent,
            ChannelMode::Upcoming => kind == GameKind::Upcoming,
        }
    }
}

impl std::str::FromStr for ChannelMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| crate::Error::Config(format!("unknown mode: {}", s)))
    }
}

impl std::fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    /// "pre", "in" or "post"
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub abbr: String,
    #[serde(default)]
    pub score: Option<u32>,
    /// Hex color such as "#c8102e"
    #[serde(default)]
    pub color: Option<String>,
}

/// A normalized game entry as delivered by the data collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    /// Group key used for separators
    #[serde(default = "default_league")]
    pub league: String,
    pub home: Team,
    pub away: Team,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_recent: bool,
    #[serde(default)]
    pub is_upcoming: bool,
    #[serde(default)]
    pub status: Option<GameStatus>,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

fn default_league() -> String {
    "unknown".to_string()
}

impl GameRecord {
    /// Resolve the kind from flags, then status state, then the explicit
    /// hint, then `fallback`.
    pub fn kind(&self, fallback: GameKind) -> GameKind {
        if self.is_live {
            return GameKind::Live;
        }
        if self.is_final || self.is_recent {
            return GameKind::Recent;
        }
        if self.is_upcoming {
            return GameKind::Upcoming;
        }

        if let Some(status) = &self.status {
            match status.state.as_str() {
                "in" => return GameKind::Live,
                "post" => return GameKind::Recent,
                "pre" => return GameKind::Upcoming,
                _ => {}
            }
        }

        self.game_type
            .as_deref()
            .and_then(GameKind::parse)
            .unwrap_or(fallback)
    }
}

/// Parse a JSON array of records
pub fn parse_records(json: &str) -> crate::Result<Vec<GameRecord>> {
    Ok(serde_json::from_str(json)?)
}
