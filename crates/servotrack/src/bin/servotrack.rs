use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use servotrack::{
    find_port, ImageSequenceSource, NavigationSession, NullTransport, PidConfig, SerialTransport,
    SessionConfig, ShapeLabel,
};

/// Drive a differential-drive robot onto a colored shape target.
#[derive(Parser, Debug)]
#[command(name = "servotrack", version)]
struct Args {
    /// Directory of frames, processed in filename order
    #[arg(long)]
    images: PathBuf,

    /// Target color name from the color table
    #[arg(long, default_value = "green")]
    color: String,

    /// Target shape: triangle, rectangle, square or circle
    #[arg(long, default_value = "circle")]
    shape: String,

    /// Serial port path; omit for a vision-only dry run
    #[arg(long)]
    port: Option<String>,

    /// Auto-detect the serial port instead of naming one
    #[arg(long, conflicts_with = "port")]
    auto_port: bool,

    #[arg(long, default_value_t = 115_200)]
    baud: u32,

    /// JSON session config overriding the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable the IMU heading-hold loop during approaches
    #[arg(long)]
    heading_hold: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    servotrack::init_with_level(level)?;

    let mut config: SessionConfig = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    config.perception.color = args.color.clone();
    config.perception.selector.shape = args
        .shape
        .parse::<ShapeLabel>()
        .map_err(anyhow::Error::msg)?;
    if args.heading_hold && config.controller.heading_hold.is_none() {
        config.controller.heading_hold = Some(PidConfig::default());
    }

    let mut source = ImageSequenceSource::from_dir(&args.images)
        .with_context(|| format!("reading frames from {}", args.images.display()))?;

    let summary = match resolve_port(&args)? {
        Some(port) => {
            let transport = SerialTransport::open(&port, args.baud)?;
            NavigationSession::new(transport, config).run(&mut source)
        }
        None => {
            log::info!("no serial port selected, running vision-only");
            NavigationSession::new(NullTransport, config).run(&mut source)
        }
    };

    println!("{:?} after {} frames", summary.outcome, summary.frames);
    Ok(())
}

fn resolve_port(args: &Args) -> anyhow::Result<Option<String>> {
    if let Some(port) = &args.port {
        return Ok(Some(port.clone()));
    }
    if args.auto_port {
        return Ok(Some(find_port().context("auto-detecting the serial port")?));
    }
    Ok(None)
}
