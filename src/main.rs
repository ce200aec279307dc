// CLI binary entry point for radiorec
//
// Records a live stream into one file per track until interrupted or until
// the requested number of tracks has been saved.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use radiorec::{DirectorySink, Recorder, RecorderConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// radiorec - record internet radio streams track by track
#[derive(Parser, Debug)]
#[command(name = "radiorec")]
#[command(about = "Records an Ogg/Vorbis or ICY/MP3 radio stream into one file per track", long_about = None)]
#[command(version)]
struct Config {
    /// Stream URL
    #[arg(value_name = "STREAM_URL")]
    url: Option<String>,

    /// Output directory (default: ".")
    #[arg(short, long, value_name = "DIRECTORY")]
    dir: Option<PathBuf>,

    /// Stop after saving this many tracks
    #[arg(short = 'n', long, value_name = "COUNT")]
    limit: Option<usize>,

    /// Milliseconds to wait before reconnecting
    #[arg(long, value_name = "MS")]
    retry_delay_ms: Option<u64>,

    /// Seconds to wait for the connection to open
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// JSON configuration file; command line options take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose mode (show per-track details)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode (only warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

impl Config {
    fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    fn recorder_config(&self) -> Result<RecorderConfig> {
        let mut config = match &self.config {
            Some(path) => RecorderConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RecorderConfig::default(),
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(dir) = &self.dir {
            config.output_dir = dir.clone();
        }
        if self.limit.is_some() {
            config.track_limit = self.limit;
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry_delay_ms = delay;
        }
        if let Some(timeout) = self.connect_timeout {
            config.connect_timeout_secs = timeout;
        }
        Ok(config)
    }
}

fn main() {
    let cli = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Config) -> Result<()> {
    let config = cli.recorder_config()?;
    info!("URL: {}", config.url);
    info!("Output directory: {}", config.output_dir.display());

    let mut sink = DirectorySink::new(config.output_dir.clone());
    let recorder = Recorder::new(config).context("invalid configuration")?;
    let saved = recorder.run(&mut sink).context("recording stopped")?;
    info!("Saved {} track(s), done", saved);
    Ok(())
}
