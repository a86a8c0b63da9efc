//! Health overrides: stale weather data and lost connectivity
//!
//! When both conditions hold, `WifiDisconnected` wins: without a network the
//! data going stale is a consequence, not a separate fault.

use std::net::{SocketAddr, TcpStream};

use embassy_time::Instant;
use log::{debug, info, warn};

use crate::color::Rgb;
use crate::config::{ColorPalette, DEFAULT_PROBE_ADDRESS, HealthConfig};

/// Health condition that replaces the weather display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthOverride {
    #[default]
    None,
    StaleData,
    WifiDisconnected,
}

impl HealthOverride {
    /// Combine the individual checks with the fixed precedence
    pub const fn resolve(stale: bool, disconnected: bool) -> Self {
        if disconnected {
            Self::WifiDisconnected
        } else if stale {
            Self::StaleData
        } else {
            Self::None
        }
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Color painted on every airport slot while active
    pub const fn color(self, palette: &ColorPalette) -> Option<Rgb> {
        match self {
            Self::None => None,
            Self::StaleData => Some(palette.stale_data),
            Self::WifiDisconnected => Some(palette.wifi_disconnected),
        }
    }
}

/// Boolean network reachability probe
pub trait ConnectivityProbe {
    fn is_connected(&mut self) -> bool;
}

/// Probe that opens a TCP connection to a well-known address
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: SocketAddr,
    timeout: core::time::Duration,
}

impl TcpProbe {
    pub const fn new(address: SocketAddr, timeout: core::time::Duration) -> Self {
        Self { address, timeout }
    }

    /// Probe configured from the health section
    pub fn from_config(config: &HealthConfig) -> Self {
        let address = config
            .probe_address
            .parse()
            .or_else(|_| DEFAULT_PROBE_ADDRESS.parse())
            .unwrap_or_else(|_| SocketAddr::from(([8, 8, 8, 8], 53)));
        Self::new(
            address,
            core::time::Duration::from_millis(config.probe_timeout_ms),
        )
    }
}

impl ConnectivityProbe for TcpProbe {
    fn is_connected(&mut self) -> bool {
        match TcpStream::connect_timeout(&self.address, self.timeout) {
            Ok(_) => true,
            Err(err) => {
                debug!("connectivity probe to {} failed: {err}", self.address);
                false
            }
        }
    }
}

/// Evaluates both health checks once per cycle
#[derive(Debug)]
pub struct HealthMonitor<P: ConnectivityProbe> {
    probe: P,
    last_check: Option<Instant>,
    connected: bool,
    reported: HealthOverride,
}

impl<P: ConnectivityProbe> HealthMonitor<P> {
    pub const fn new(probe: P) -> Self {
        Self {
            probe,
            last_check: None,
            connected: true,
            reported: HealthOverride::None,
        }
    }

    /// Check if the snapshot is older than twice the update interval
    ///
    /// An unknown age is not treated as stale; missing data already shows
    /// as missing airports.
    pub fn is_stale(config: &HealthConfig, age: Option<core::time::Duration>) -> bool {
        config.stale_check_enabled && age.is_some_and(|age| age > config.stale_after())
    }

    /// Connectivity, re-probed at most once per check interval
    pub fn is_connected(&mut self, config: &HealthConfig, now: Instant) -> bool {
        if !config.wifi_check_enabled {
            return true;
        }
        let due = self.last_check.is_none_or(|last| {
            now.checked_duration_since(last)
                .is_none_or(|elapsed| elapsed >= config.wifi_check_interval())
        });
        if due {
            self.connected = self.probe.is_connected();
            self.last_check = Some(now);
        }
        self.connected
    }

    /// Resolve this cycle's override
    pub fn evaluate(
        &mut self,
        config: &HealthConfig,
        now: Instant,
        data_age: Option<core::time::Duration>,
    ) -> HealthOverride {
        let stale = Self::is_stale(config, data_age);
        let disconnected = !self.is_connected(config, now);
        let health = HealthOverride::resolve(stale, disconnected);

        if health != self.reported {
            match health {
                HealthOverride::None => info!("health restored"),
                HealthOverride::StaleData => warn!(
                    "weather data is stale (age {:?})",
                    data_age.unwrap_or_default()
                ),
                HealthOverride::WifiDisconnected => warn!("network connectivity lost"),
            }
            self.reported = health;
        }
        health
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }
}
