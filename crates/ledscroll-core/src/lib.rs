pub mod cache;
pub mod channel;
pub mod config;
pub mod display;
pub mod error;
pub mod record;
pub mod render;
pub mod scheduler;
pub mod scroll;
pub mod separators;
pub mod source;
pub mod tile;

pub use cache::SharedRecordCache;
pub use channel::{channel, ChannelManager, ChannelSettings, ContentPreparer, FrameOutcome, ScrollChannel};
pub use config::{AppConfig, ScrollConfig};
pub use display::{DisplayDriver, NullDisplay, PngSnapshotDisplay};
pub use error::{Error, Result};
pub use record::{ChannelMode, GameKind, GameRecord};
pub use render::{CardRenderer, TileRenderer};
pub use source::{DataSource, JsonFileSource, StaticSource};
pub use tile::ContentTile;
