use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use ledscroll_core::{
    scheduler::{RefreshEvent, RefreshService},
    scroll::ScrollConfigExt,
    AppConfig, ChannelManager, DisplayDriver, FrameOutcome, NullDisplay, PngSnapshotDisplay,
};
use ledscroll_tui::{
    is_quit_key,
    widgets::PreviewStatus,
    AppEvent, EventHandler, TerminalDisplay, Theme,
};

use super::{DataOptions, Engine};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub data: DataOptions,
    /// Skip the terminal preview
    pub headless: bool,
    /// Stop after this many completed cycles
    pub cycles: Option<u64>,
    /// Write frames as PNGs into this directory
    pub snapshots: Option<PathBuf>,
    /// With `snapshots`, keep every n-th frame
    pub snapshot_every: u64,
}

impl RunOptions {
    /// Whether the terminal preview will be shown
    pub fn uses_terminal(&self) -> bool {
        !self.headless && self.snapshots.is_none()
    }
}

pub async fn run(config: Arc<AppConfig>, options: RunOptions) -> Result<()> {
    let engine = Engine::build(&config, &options.data)?;
    let (event_tx, event_rx) = mpsc::unbounded_channel::<RefreshEvent>();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let service = RefreshService::new(
        engine.source,
        engine.cache,
        engine.preparers,
        Duration::from_secs(config.data.refresh_interval_secs),
    )
    .with_event_sender(event_tx);
    let service_handle = tokio::spawn(service.run(shutdown_rx.clone()));

    let manager = ChannelManager::new(engine.channels);
    let tick = config.scroll.scroll_config().tick_duration();
    let (width, height) = (config.display.width, config.display.height);

    let result = if options.uses_terminal() {
        run_preview(manager, width, height, tick, options.cycles, event_rx)
    } else {
        // Setup signal handler for graceful shutdown
        let shutdown_tx_clone = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
            let _ = shutdown_tx_clone.send(true);
        });

        let driver: Box<dyn DisplayDriver + Send> = match &options.snapshots {
            Some(dir) => {
                info!("Writing every {} frame(s) to {}", options.snapshot_every.max(1), dir.display());
                Box::new(PngSnapshotDisplay::new(dir, width, height, options.snapshot_every)?)
            }
            None => Box::new(NullDisplay::new(width, height)),
        };
        run_headless(manager, driver, tick, options.cycles, event_rx, shutdown_rx).await
    };

    let _ = shutdown_tx.send(true);
    let _ = service_handle.await;
    result
}

/// Log refresh events; returns a notice for the preview when one applies
fn handle_refresh_event(event: RefreshEvent) -> Option<String> {
    match event {
        RefreshEvent::RecordsRefreshed { count } => {
            debug!("Refresh delivered {} records", count);
            None
        }
        RefreshEvent::ChannelPrepared { summary } => {
            debug!("[{}] Strip ready: {}px", summary.mode, summary.total_width);
            None
        }
        RefreshEvent::ChannelEmpty { mode } => Some(format!("No {} games", mode)),
        RefreshEvent::Error { task, message } => {
            warn!("Background {} failed: {}", task, message);
            Some(format!("{} failed: {}", task, message))
        }
    }
}

fn cycles_done(manager: &ChannelManager, cycles: Option<u64>) -> bool {
    cycles.is_some_and(|n| manager.completed_cycles() >= n)
}

async fn run_headless(
    mut manager: ChannelManager,
    mut driver: Box<dyn DisplayDriver + Send>,
    tick: Duration,
    cycles: Option<u64>,
    mut event_rx: mpsc::UnboundedReceiver<RefreshEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    info!("Headless playback at {:.1} fps", 1.0 / tick.as_secs_f64());
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut presented: u64 = 0;

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    break;
                }
            }

            _ = interval.tick() => {
                while let Ok(event) = event_rx.try_recv() {
                    handle_refresh_event(event);
                }
                if manager.display_frame(driver.as_mut()) == FrameOutcome::Presented {
                    presented += 1;
                }
                if cycles_done(&manager, cycles) {
                    break;
                }
            }
        }
    }

    info!(
        "Playback stopped after {} frames, {} cycles",
        presented,
        manager.completed_cycles()
    );
    Ok(())
}

fn preview_status(manager: &ChannelManager, notice: &Option<String>) -> PreviewStatus {
    let current = manager.current();
    let playing = current.is_some_and(|c| c.clock().has_content());
    PreviewStatus {
        mode: current.map(|c| c.mode().to_string()).unwrap_or_default(),
        info: current.filter(|_| playing).map(|c| c.info()),
        fps: current.and_then(|c| c.last_fps()),
        message: if playing { None } else { notice.clone() },
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PreviewAction {
    Quit,
    /// Draw without waiting out the current tick
    Redraw,
    Continue,
}

fn preview_action(event: Option<AppEvent>) -> PreviewAction {
    match event {
        Some(AppEvent::Key(key)) if is_quit_key(&key) => PreviewAction::Quit,
        Some(AppEvent::Resize(cols, rows)) => {
            debug!("Terminal resized to {}x{}", cols, rows);
            PreviewAction::Redraw
        }
        Some(AppEvent::Key(_)) | Some(AppEvent::Tick) | None => PreviewAction::Continue,
    }
}

fn run_preview(
    mut manager: ChannelManager,
    width: u32,
    height: u32,
    tick: Duration,
    cycles: Option<u64>,
    mut event_rx: mpsc::UnboundedReceiver<RefreshEvent>,
) -> Result<()> {
    let mut display = TerminalDisplay::enter(width, height, Theme::default())?;
    let events = EventHandler::new();
    let mut notice = Some("Loading games...".to_string());
    let mut next_tick = Instant::now();

    // Main loop
    loop {
        // Process refresh results (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            if let Some(message) = handle_refresh_event(event) {
                notice = Some(message);
            }
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        match preview_action(events.poll(timeout)?) {
            PreviewAction::Quit => break,
            PreviewAction::Redraw => next_tick = Instant::now(),
            PreviewAction::Continue => {}
        }

        let now = Instant::now();
        if now < next_tick {
            continue;
        }
        next_tick += tick;
        if next_tick < now {
            next_tick = now + tick;
        }

        display.set_status(preview_status(&manager, &notice));
        if manager.display_frame(&mut display) == FrameOutcome::NoContent {
            display.show_message(notice.as_deref().unwrap_or("No games to show"))?;
        }
        if cycles_done(&manager, cycles) {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledscroll_core::ChannelMode;

    #[test]
    fn test_uses_terminal() {
        let mut options = RunOptions::default();
        assert!(options.uses_terminal());
        options.snapshots = Some(PathBuf::from("frames"));
        assert!(!options.uses_terminal());
        options.snapshots = None;
        options.headless = true;
        assert!(!options.uses_terminal());
    }

    #[test]
    fn test_refresh_event_notices() {
        assert_eq!(
            handle_refresh_event(RefreshEvent::ChannelEmpty {
                mode: ChannelMode::Live
            }),
            Some("No live games".to_string())
        );
        assert!(handle_refresh_event(RefreshEvent::RecordsRefreshed { count: 3 }).is_none());
        assert!(handle_refresh_event(RefreshEvent::Error {
            task: "refresh".into(),
            message: "offline".into()
        })
        .unwrap()
        .contains("offline"));
    }

    #[test]
    fn test_preview_actions() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let other = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(preview_action(Some(AppEvent::Key(quit))), PreviewAction::Quit);
        assert_eq!(preview_action(Some(AppEvent::Key(other))), PreviewAction::Continue);
        assert_eq!(preview_action(Some(AppEvent::Resize(80, 24))), PreviewAction::Redraw);
        assert_eq!(preview_action(Some(AppEvent::Tick)), PreviewAction::Continue);
        assert_eq!(preview_action(None), PreviewAction::Continue);
    }

    #[test]
    fn test_cycles_done() {
        let manager = ChannelManager::new(Vec::new());
        assert!(!cycles_done(&manager, None));
        assert!(cycles_done(&manager, Some(0)));
        assert!(!cycles_done(&manager, Some(1)));
    }
}
