use crate::cache::SharedRecordCache;
use crate::channel::{ContentPreparer, PrepareSummary};
use crate::record::{ChannelMode, GameRecord};
use crate::render::TileRenderer;
use crate::source::DataSource;
use crate::Result;

/// Fetch fresh records into the shared cache
pub async fn refresh_records<S: DataSource>(cache: &SharedRecordCache, source: &S) -> Result<usize> {
    let count = cache.refresh(source).await?;
    tracing::info!("Refreshed {} records from {}", count, source.name());
    Ok(count)
}

/// Rebuild every channel's strip from `records`
pub fn prepare_all<S, R>(
    preparers: &[ContentPreparer<S, R>],
    records: &[GameRecord],
) -> Vec<(ChannelMode, Result<PrepareSummary>)>
where
    S: DataSource,
    R: TileRenderer,
{
    preparers
        .iter()
        .map(|preparer| (preparer.mode(), preparer.prepare_from(records)))
        .collect()
}
