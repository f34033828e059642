use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::record::{parse_records, GameRecord};
use crate::Result;

/// Where game records come from
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the current ordered record list
    async fn fetch(&self) -> Result<Vec<GameRecord>>;
}

/// Reads a JSON array of normalized records from disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<GameRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            crate::Error::DataSource(format!("{}: {}", self.path.display(), e))
        })?;
        parse_records(&content)
    }
}

/// Fixed in-memory records
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<GameRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<GameRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<GameRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.json");
        std::fs::write(
            &path,
            r#"[{"id": "1", "league": "nfl", "home": {"abbr": "KC"}, "away": {"abbr": "BUF"}}]"#,
        )
        .unwrap();

        let source = JsonFileSource::new(&path);
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].league, "nfl");
        assert!(source.name().starts_with("file:"));
    }

    #[tokio::test]
    async fn test_missing_file_is_data_source_error() {
        let source = JsonFileSource::new("/nonexistent/ledscroll/games.json");
        assert!(matches!(
            source.fetch().await,
            Err(crate::Error::DataSource(_))
        ));
    }
}
