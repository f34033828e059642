use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::cache::SharedRecordCache;
use crate::channel::{ContentPreparer, PrepareSummary};
use crate::record::ChannelMode;
use crate::render::TileRenderer;
use crate::source::DataSource;
use crate::Error;

use super::tasks::{prepare_all, refresh_records};

/// Events emitted by the refresh service so the display side can react
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// Records were fetched into the shared cache
    RecordsRefreshed { count: usize },
    /// A channel published a new strip
    ChannelPrepared { summary: PrepareSummary },
    /// A channel has nothing to show
    ChannelEmpty { mode: ChannelMode },
    /// An error occurred during a background task
    Error { task: String, message: String },
}

/// Background service that refetches records and rebuilds channel strips
pub struct RefreshService<S, R> {
    source: Arc<S>,
    cache: Arc<SharedRecordCache>,
    preparers: Vec<ContentPreparer<S, R>>,
    refresh_interval: Duration,
    event_tx: Option<mpsc::UnboundedSender<RefreshEvent>>,
}

impl<S: DataSource, R: TileRenderer> RefreshService<S, R> {
    /// `refresh_interval` of zero prepares once and then idles until shutdown
    pub fn new(
        source: Arc<S>,
        cache: Arc<SharedRecordCache>,
        preparers: Vec<ContentPreparer<S, R>>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            preparers,
            refresh_interval,
            event_tx: None,
        }
    }

    /// Set the event sender for display notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<RefreshEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn send_event(&self, event: RefreshEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send refresh event: receiver dropped");
            }
        }
    }

    /// Fetch records and rebuild every channel now.
    ///
    /// A failed fetch is reported and the channels are rebuilt from the
    /// records already cached. Returns the number of channels prepared.
    pub async fn refresh_now(&self) -> usize {
        match refresh_records(&self.cache, self.source.as_ref()).await {
            Ok(count) => self.send_event(RefreshEvent::RecordsRefreshed { count }),
            Err(e) => {
                error!("Record refresh failed: {}", e);
                self.send_event(RefreshEvent::Error {
                    task: "refresh".to_string(),
                    message: e.to_string(),
                });
            }
        }

        let records = self.cache.records();
        let mut prepared = 0;
        for (mode, result) in prepare_all(&self.preparers, &records) {
            match result {
                Ok(summary) => {
                    prepared += 1;
                    self.send_event(RefreshEvent::ChannelPrepared { summary });
                }
                Err(Error::EmptyContent) => {
                    debug!("[{}] Nothing to prepare", mode);
                    self.send_event(RefreshEvent::ChannelEmpty { mode });
                }
                Err(e) => {
                    error!("[{}] Preparation failed: {}", mode, e);
                    self.send_event(RefreshEvent::Error {
                        task: format!("prepare:{}", mode),
                        message: e.to_string(),
                    });
                }
            }
        }
        prepared
    }

    /// Run refreshes in a loop until shutdown signal
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        self.refresh_now().await;

        if self.refresh_interval.is_zero() {
            info!("Periodic refresh disabled (refresh_interval_secs = 0)");
            let _ = shutdown.changed().await;
            return;
        }

        info!(
            "Refresh service started: {} channels every {}s",
            self.preparers.len(),
            self.refresh_interval.as_secs()
        );

        let mut refresh_interval = tokio::time::interval(self.refresh_interval);
        // Skip the first tick (fires immediately)
        refresh_interval.tick().await;

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Refresh service received shutdown signal");
                        break;
                    }
                }

                _ = refresh_interval.tick() => {
                    debug!("Running scheduled refresh");
                    let prepared = self.refresh_now().await;
                    debug!("Scheduled refresh prepared {} channels", prepared);
                }
            }
        }

        info!("Refresh service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{channel, ChannelSettings, ScrollChannel};
    use crate::config::AppConfig;
    use crate::record::{GameRecord, GameStatus};
    use crate::render::CardRenderer;
    use crate::separators::SeparatorSet;
    use crate::source::StaticSource;
    use tokio::time::timeout;

    fn game(id: &str, state: &str) -> GameRecord {
        GameRecord {
            id: id.into(),
            league: "nba".into(),
            status: Some(GameStatus {
                state: state.into(),
                detail: None,
            }),
            ..Default::default()
        }
    }

    fn service(
        interval: Duration,
    ) -> (RefreshService<StaticSource, CardRenderer>, Vec<ScrollChannel>) {
        let source = Arc::new(StaticSource::new(vec![game("1", "in"), game("2", "pre")]));
        let cache = Arc::new(SharedRecordCache::new(Duration::from_secs(60)));
        let renderer = Arc::new(CardRenderer::new(32, 16, 2));
        let separators = Arc::new(SeparatorSet::new());
        let mut config = AppConfig::default();
        config.display.width = 32;
        let settings = ChannelSettings::from_config(&config);

        let mut preparers = Vec::new();
        let mut channels = Vec::new();
        for mode in [ChannelMode::Live, ChannelMode::Recent] {
            let (preparer, playback) = channel(
                mode,
                source.clone(),
                renderer.clone(),
                cache.clone(),
                separators.clone(),
                settings.clone(),
            );
            preparers.push(preparer);
            channels.push(playback);
        }
        (RefreshService::new(source, cache, preparers, interval), channels)
    }

    #[tokio::test]
    async fn test_refresh_now_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (service, channels) = service(Duration::from_secs(3600));
        let service = service.with_event_sender(tx);

        assert_eq!(service.refresh_now().await, 1);
        assert!(matches!(
            rx.recv().await,
            Some(RefreshEvent::RecordsRefreshed { count: 2 })
        ));
        match rx.recv().await {
            Some(RefreshEvent::ChannelPrepared { summary }) => {
                assert_eq!(summary.mode, ChannelMode::Live);
                assert_eq!(summary.tiles, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(
            rx.recv().await,
            Some(RefreshEvent::ChannelEmpty {
                mode: ChannelMode::Recent
            })
        ));
        assert!(channels[0].has_content());
        assert!(!channels[1].has_content());
    }

    #[tokio::test]
    async fn test_service_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (service, channels) = service(Duration::from_secs(3600));

        let handle = tokio::spawn(service.run(shutdown_rx));
        tokio::task::yield_now().await;
        shutdown_tx.send(true).unwrap();

        let result = timeout(Duration::from_secs(1), handle).await;
        assert!(result.is_ok());
        assert!(channels[0].has_content());
    }

    #[tokio::test]
    async fn test_disabled_interval_waits_for_shutdown() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (service, _channels) = service(Duration::ZERO);

        let handle = tokio::spawn(service.run(shutdown_rx));
        shutdown_tx.send(true).unwrap();
        assert!(timeout(Duration::from_secs(1), handle).await.is_ok());
    }
}
