use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use adofai_auto::AutoPlayer;
use adofai_auto::config::{CONFIG_FILE, PlayerConfig};
use adofai_auto::hand::FingeringMode;
use adofai_auto::input::{DryRunInjector, InputLogger, KeyInjector};
use adofai_auto::traits::time::SystemTimeProvider;
use adofai_auto::util::logging::init_logging;

#[derive(Parser)]
#[command(name = "adofai-auto", about = "Play an ADOFAI level with synthetic key presses")]
struct Args {
    /// Level file (.adofai)
    level: PathBuf,

    /// Config file; missing files fall back to defaults
    #[arg(long, default_value = CONFIG_FILE, env = "ADOFAI_AUTO_CONFIG")]
    config: PathBuf,

    /// Keys left to right, comma separated (e.g. a,s,k,l)
    #[arg(long, value_delimiter = ',')]
    keys: Option<Vec<String>>,

    /// Maximum taps per second for one hand
    #[arg(long)]
    cps: Option<f64>,

    /// Extra seconds to wait after the countdown
    #[arg(long)]
    wait: Option<f64>,

    #[arg(long, value_enum)]
    mode: Option<FingeringMode>,

    /// Log key events instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Write the hand schedule as JSON and exit without playing
    #[arg(long)]
    export_schedule: Option<PathBuf>,

    /// Write the issued key events as JSON after playing
    #[arg(long)]
    export_log: Option<PathBuf>,

    /// Also write logs to a daily file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn player_config(&self) -> Result<PlayerConfig> {
        let mut config = PlayerConfig::load_from(&self.config)?;
        if let Some(keys) = &self.keys {
            config.keys = keys.clone();
        }
        if let Some(cps) = self.cps {
            config.one_hand_cps = cps;
        }
        if let Some(wait) = self.wait {
            config.wait_secs = wait;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        Ok(config)
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(args.log_dir.as_deref(), args.verbose) {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    if let Err(e) = run(&args) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.player_config()?;
    let player = AutoPlayer::new(&args.level, config)?;

    if let Some(path) = &args.export_schedule {
        player.export_schedule(path)?;
        info!("Wrote schedule to {}", path.display());
        return Ok(());
    }

    let log = if args.dry_run {
        play_with(&player, DryRunInjector)?
    } else {
        play_with(&player, system_injector()?)?
    };

    if let Some(path) = &args.export_log {
        log.save_to(path)?;
        info!("Wrote {} key events to {}", log.len(), path.display());
    }
    Ok(())
}

fn play_with<I: KeyInjector>(player: &AutoPlayer, injector: I) -> Result<InputLogger> {
    player.play(injector, SystemTimeProvider::new())
}

#[cfg(feature = "enigo")]
fn system_injector() -> Result<adofai_auto::input::EnigoInjector> {
    Ok(adofai_auto::input::EnigoInjector::new()?)
}

#[cfg(not(feature = "enigo"))]
fn system_injector() -> Result<DryRunInjector> {
    tracing::warn!("Built without the `enigo` feature; key events are only logged");
    Ok(DryRunInjector)
}
