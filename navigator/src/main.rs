//! pinch-navigator - replay a hand-tracking session through the gesture
//! recognizer and the file explorer.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use tracing::info;

use pinch_navigator::config::{AppConfig, ScreenConfig};
use pinch_navigator::explorer::FileTree;
use pinch_navigator::session::{Session, SessionOptions};
use pinch_navigator::tracking::{Hand, ReplayProvider};

#[derive(Parser, Debug)]
#[command(name = "pinch-navigator", about = "Pinch-gesture file navigator")]
struct Cli {
    /// Recorded session file to replay (one s-expression per frame)
    #[arg(long, required_unless_present = "version")]
    session: Option<PathBuf>,

    /// Config plist overriding the default thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Screen resolution as WxH
    #[arg(long)]
    screen: Option<String>,

    /// Tracked hand: left or right
    #[arg(long)]
    hand: Option<String>,

    /// Pace frames by their recorded timestamps
    #[arg(long)]
    realtime: bool,

    /// Exit after N seconds
    #[arg(long)]
    exit_after: Option<u64>,

    /// Print an event s-expression for every gesture transition
    #[arg(long)]
    emit_events: bool,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("pinch-navigator {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinch_navigator=info".into()),
        )
        .init();

    info!("pinch-navigator v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(res) = &cli.screen {
        match ScreenConfig::parse_resolution(res) {
            Some(screen) => config.screen = screen,
            None => bail!("invalid --screen {res}: expected WxH, e.g. 1920x1080"),
        }
    }
    if let Some(hand) = &cli.hand {
        match Hand::parse(hand) {
            Some(h) => config.tracking.tracked_hand = h,
            None => bail!("unknown --hand {hand}: use left or right"),
        }
    }

    let Some(session_path) = cli.session else {
        bail!("--session is required");
    };
    info!(
        "session: {} screen {}x{} hand {}",
        session_path.display(),
        config.screen.width,
        config.screen.height,
        config.tracking.tracked_hand.as_str()
    );

    let options = SessionOptions {
        realtime: cli.realtime,
        exit_after: cli.exit_after.map(Duration::from_secs),
        emit_events: cli.emit_events,
        ..SessionOptions::default()
    };
    let mut session = Session::new(
        ReplayProvider::open(&session_path),
        &config,
        FileTree::mock(),
        options,
    );

    let stdout = std::io::stdout();
    let summary = session.run(&mut stdout.lock())?;
    info!(
        "{} frame(s), {} result(s) applied, {} event(s)",
        summary.frames, summary.applied, summary.events
    );
    Ok(())
}
