use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::SystemTime;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info, warn};

use myrtio_metar_composer::color::{Rgb, parse_hex_color, to_hex_color};
use myrtio_metar_composer::config::StripConfig;
use myrtio_metar_composer::intent::{IntentSender, intent_channel, request_reload};
use myrtio_metar_composer::{
    BlockingDelay, Config, Delay, Duration, HardwareError, LogOutput, MetarEngine, OutputDriver,
    Roster, TcpProbe, WeatherFile,
};

/// How often the config file is checked for changes
const CONFIG_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(version, about = "Drive a METAR weather map LED strip")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the weather map until interrupted
    Run,
    /// Turn every LED off and exit
    Blank,
    /// Fill the strip with one color, then blank it
    Test {
        /// Color as #RRGGBB
        #[arg(long, default_value = "#FFFFFF")]
        color: String,
        /// How long to show the color
        #[arg(long, default_value_t = 3000)]
        hold_ms: u64,
    },
}

/// Strip driver chosen once at startup
enum Strip {
    Log(LogOutput),
    #[cfg(feature = "spi")]
    Spi(myrtio_metar_composer::output::SpiStrip),
}

impl Strip {
    fn open(config: &StripConfig) -> Result<Self, HardwareError> {
        match config.driver.device_path() {
            None => Ok(Self::Log(LogOutput::new())),
            #[cfg(feature = "spi")]
            Some(path) => myrtio_metar_composer::output::open_spi(path, config).map(Self::Spi),
            #[cfg(not(feature = "spi"))]
            Some(path) => {
                warn!("built without SPI support, logging frames instead of driving {path}");
                Ok(Self::Log(LogOutput::new()))
            }
        }
    }
}

impl OutputDriver for Strip {
    fn write(&mut self, colors: &[Rgb]) -> Result<(), HardwareError> {
        match self {
            Self::Log(output) => output.write(colors),
            #[cfg(feature = "spi")]
            Self::Spi(output) => output.write(colors),
        }
    }

    fn show(&mut self) -> Result<(), HardwareError> {
        match self {
            Self::Log(output) => output.show(),
            #[cfg(feature = "spi")]
            Self::Spi(output) => output.show(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();

    info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_fallback(&cli.config);
    let mut strip = Strip::open(&config.strip)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&cli.config, config, strip)?,
        Command::Blank => {
            strip.push(&vec![Rgb::default(); config.strip.pixel_count])?;
            info!("strip blanked");
        }
        Command::Test { color, hold_ms } => {
            let color = parse_hex_color(&color)?;
            info!("showing {} on {} pixels", to_hex_color(color), config.strip.pixel_count);
            strip.push(&vec![color; config.strip.pixel_count])?;
            BlockingDelay.delay(Duration::from_millis(hold_ms));
            strip.push(&vec![Rgb::default(); config.strip.pixel_count])?;
        }
    }
    Ok(())
}

fn run(config_path: &Path, config: Config, strip: Strip) -> Result<(), Box<dyn Error>> {
    let stop = setup_shutdown_handler()?;

    let pixel_count = config.strip.pixel_count;
    let roster = Roster::load(&config.files.airports, pixel_count).unwrap_or_else(|err| {
        error!("{err}, every slot left unused");
        Roster::empty(pixel_count)
    });
    let weather = WeatherFile::new(config.files.weather.clone());
    let probe = TcpProbe::from_config(&config.health);

    let (sender, receiver) = intent_channel();
    spawn_config_watcher(config_path.to_path_buf(), sender, Arc::clone(&stop));

    let mut engine =
        MetarEngine::new(config, roster, weather, strip, BlockingDelay, probe, receiver);
    engine.run(&stop);
    Ok(())
}

fn setup_shutdown_handler() -> Result<Arc<AtomicBool>, std::io::Error> {
    let shutdown = Arc::new(AtomicBool::new(false));

    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))?;

    info!("shutdown handlers registered");
    Ok(shutdown)
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Poll the config file and send a reload whenever it changes
fn spawn_config_watcher(path: PathBuf, sender: IntentSender, stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        let mut last_seen = modified_at(&path);
        while !stop.load(Ordering::Relaxed) {
            thread::sleep(CONFIG_POLL_INTERVAL);
            let modified = modified_at(&path);
            if modified == last_seen {
                continue;
            }
            last_seen = modified;
            match Config::load(&path) {
                Ok(config) => {
                    info!("config file {} changed, reloading", path.display());
                    request_reload(&sender, config);
                }
                Err(err) => warn!("ignoring changed config {}: {err}", path.display()),
            }
        }
    });
}
