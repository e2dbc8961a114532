//! Frame-driven session loop.
//!
//! Owns the tracking provider, the gesture recognizer and the explorer.
//! Each tick reads one frame, steps the recognizer, hands the result to
//! the explorer through a channel and drains it before the next frame.
//! Handles SIGINT/SIGTERM, an optional exit timer, optional real-time
//! pacing and periodic status logging.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::explorer::{ExplorerState, FileTree, LayoutConfig};
use crate::gesture::{GestureRecognizer, GestureResult};
use crate::tracking::HandTrackingProvider;

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// How a session is driven.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Sleep between frames by their timestamp gaps.
    pub realtime: bool,
    /// Stop after this much wall-clock time.
    pub exit_after: Option<Duration>,
    /// Write one event s-expression per non-idle result.
    pub emit_events: bool,
    /// Wall-clock interval between status log lines.
    pub status_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            realtime: false,
            exit_after: None,
            emit_events: false,
            status_interval: Duration::from_secs(10),
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// Provider ran out of frames.
    #[default]
    EndOfStream,
    /// SIGINT or SIGTERM.
    Signal,
    /// `exit_after` elapsed.
    Timer,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfStream => "end-of-stream",
            Self::Signal => "signal",
            Self::Timer => "timer",
        }
    }
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub frames: u64,
    /// Results the explorer accepted.
    pub applied: u64,
    pub events: u64,
    pub clicks: u64,
    pub double_clicks: u64,
    pub drags: u64,
    pub hidden_frames: u64,
    pub stop: StopReason,
}

pub struct Session<P: HandTrackingProvider> {
    provider: P,
    pub recognizer: GestureRecognizer,
    pub explorer: ExplorerState,
    options: SessionOptions,
}

impl<P: HandTrackingProvider> Session<P> {
    pub fn new(provider: P, config: &AppConfig, tree: FileTree, options: SessionOptions) -> Self {
        let width = config.screen.width as f32;
        let height = config.screen.height as f32;
        let layout = LayoutConfig {
            screen_width: width,
            screen_height: height,
            ..LayoutConfig::default()
        };
        Self {
            provider,
            recognizer: GestureRecognizer::new(
                config.gesture.clone(),
                config.tracking.clone(),
                width,
                height,
            ),
            explorer: ExplorerState::new(tree, layout),
            options,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run until the provider ends, a signal arrives or the exit timer
    /// fires. Events go to `events` when enabled.
    pub fn run(&mut self, events: &mut dyn Write) -> anyhow::Result<SessionSummary> {
        if let Err(e) = self.provider.initialize() {
            warn!("{}: {}", self.provider.name(), e);
            return Err(anyhow::Error::new(e))
                .with_context(|| format!("starting session from {}", self.provider.name()));
        }
        info!(
            "session started: {} ({})",
            self.provider.name(),
            self.recognizer.config_sexp()
        );

        install_signal_handlers();

        let (tx, rx) = mpsc::channel::<GestureResult>();
        let start_time = Instant::now();
        let mut last_status_log = Instant::now();
        let mut last_timestamp: Option<u64> = None;
        let mut summary = SessionSummary::default();

        while let Some(frame) = self.provider.detect() {
            if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
                info!("Shutdown signal received, exiting");
                summary.stop = StopReason::Signal;
                break;
            }
            if let Some(dur) = self.options.exit_after {
                if start_time.elapsed() >= dur {
                    info!("exit timer fired after {}s", dur.as_secs_f32());
                    summary.stop = StopReason::Timer;
                    break;
                }
            }

            if self.options.realtime {
                if let Some(prev) = last_timestamp {
                    let gap = frame.timestamp_ms.saturating_sub(prev);
                    if gap > 0 {
                        std::thread::sleep(Duration::from_millis(gap));
                    }
                }
            }
            last_timestamp = Some(frame.timestamp_ms);

            let result = self.recognizer.step(
                &frame,
                &self.explorer.layout,
                self.explorer.selected_items(),
            );
            summary.frames += 1;
            tx.send(result).context("gesture result channel closed")?;

            for result in rx.try_iter() {
                if self.options.emit_events {
                    if let Some(event) = result.event_sexp() {
                        writeln!(events, "{}", event).context("writing event")?;
                        summary.events += 1;
                    }
                }
                if self.explorer.apply(&result) {
                    summary.applied += 1;
                }
            }

            if last_status_log.elapsed() >= self.options.status_interval {
                info!(
                    "status: frame {} state {} | {}",
                    summary.frames,
                    self.recognizer.state().as_str(),
                    self.explorer.status_line()
                );
                last_status_log = Instant::now();
            }
        }

        if self.recognizer.state().in_drag() {
            debug!("session ended mid-drag, dropping drag feedback");
            self.explorer.cancel_drag();
        }
        self.recognizer.reset();

        let stats = self.recognizer.stats();
        summary.clicks = stats.clicks;
        summary.double_clicks = stats.double_clicks;
        summary.drags = stats.drags;
        summary.hidden_frames = stats.hidden_frames;

        info!(
            "session finished ({}): {} frame(s) in {:.1}s, {} click(s), {} double click(s), {} drag(s), {} hidden frame(s) | {}",
            summary.stop.as_str(),
            summary.frames,
            start_time.elapsed().as_secs_f32(),
            summary.clicks,
            summary.double_clicks,
            summary.drags,
            summary.hidden_frames,
            self.explorer.status_line()
        );
        debug!("final state: {}", self.explorer.status_sexp());
        Ok(summary)
    }
}
