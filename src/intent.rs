//! Requests delivered to the engine between cycles

use log::{info, warn};

use crate::channel::{Receiver, Sender, channel};
use crate::config::Config;

/// Capacity of the intent queue
pub const INTENT_QUEUE_SIZE: usize = 4;

/// Request for the engine, applied at the next cycle boundary
#[derive(Debug, Clone)]
pub enum EngineIntent {
    /// Swap in a new configuration snapshot
    ReloadConfig(Box<Config>),
    /// Stop after the current cycle and blank the strip
    Shutdown,
}

/// Type alias for intent sender
pub type IntentSender = Sender<EngineIntent, INTENT_QUEUE_SIZE>;

/// Type alias for intent receiver
pub type IntentReceiver = Receiver<EngineIntent, INTENT_QUEUE_SIZE>;

/// Create the engine's intent queue
pub fn intent_channel() -> (IntentSender, IntentReceiver) {
    channel()
}

/// Send a reload, logging instead of blocking when the queue is full
pub fn request_reload(sender: &IntentSender, config: Config) -> bool {
    match sender.try_send(EngineIntent::ReloadConfig(Box::new(config))) {
        Ok(()) => true,
        Err(_) => {
            warn!("intent queue full, dropping config reload");
            false
        }
    }
}

/// Outcome of draining the queue that the engine should apply
#[derive(Debug, Default)]
pub struct IntentEffects {
    /// Latest configuration received, if any
    pub config: Option<Box<Config>>,
    pub shutdown: bool,
}

impl IntentEffects {
    pub const fn has_effects(&self) -> bool {
        self.config.is_some() || self.shutdown
    }
}

/// Drains pending intents without blocking
pub struct IntentProcessor {
    intents: IntentReceiver,
}

impl IntentProcessor {
    pub const fn new(intents: IntentReceiver) -> Self {
        Self { intents }
    }

    /// Drain every queued intent; a later reload replaces an earlier one
    pub fn process_pending(&mut self) -> IntentEffects {
        let mut effects = IntentEffects::default();

        while let Ok(intent) = self.intents.try_receive() {
            match intent {
                EngineIntent::ReloadConfig(config) => {
                    if effects.config.is_some() {
                        info!("superseding queued config reload");
                    }
                    effects.config = Some(config);
                }
                EngineIntent::Shutdown => effects.shutdown = true,
            }
        }

        effects
    }
}
