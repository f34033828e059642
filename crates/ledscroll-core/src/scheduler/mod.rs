mod service;
pub mod tasks;

pub use service::{RefreshEvent, RefreshService};
pub use tasks::{prepare_all, refresh_records};
