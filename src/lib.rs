pub mod bounds;
pub mod channel;
pub mod classify;
pub mod color;
pub mod composer;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod health;
pub mod intent;
pub mod legend;
pub mod math8;
pub mod output;
pub mod roster;
pub mod schedule;
pub mod sequencer;
pub mod sun;
pub mod weather;

pub use bounds::RenderingBounds;
pub use classify::{ClassifiedWeather, Condition, ConditionClassifier};
pub use color::Rgb;
pub use composer::FrameComposer;
pub use config::Config;
pub use effect::{AnimationKind, AnimationSlot, AnimationSpec};
pub use engine::{CycleOutcome, CycleReport, CycleTime, MetarEngine};
pub use error::{ConfigError, DataError, HardwareError};
pub use health::{ConnectivityProbe, HealthMonitor, HealthOverride, TcpProbe};
pub use intent::{EngineIntent, IntentProcessor, IntentReceiver, IntentSender, intent_channel};
pub use legend::{LegendItem, LegendOverlay};
pub use output::{LogOutput, SmartLedsOutput};
pub use roster::{Roster, Slot};
pub use schedule::{OperatingMode, PowerScheduleEvaluator, in_window};
pub use sequencer::{AnimationSequencer, PassContext};
pub use weather::{AirportRecord, FlightCategory, WeatherFile, WeatherSnapshot, WeatherSource};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The engine is generic over this trait.
pub trait OutputDriver {
    /// Stage a full-length frame
    fn write(&mut self, colors: &[Rgb]) -> Result<(), HardwareError>;

    /// Flush the staged frame to the strip
    fn show(&mut self) -> Result<(), HardwareError> {
        Ok(())
    }

    /// Write then flush
    fn push(&mut self, colors: &[Rgb]) -> Result<(), HardwareError> {
        self.write(colors)?;
        self.show()
    }
}

/// Blocking pause between sub-frames
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// [`Delay`] that parks the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingDelay;

impl Delay for BlockingDelay {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(core::time::Duration::from_micros(duration.as_micros()));
    }
}
