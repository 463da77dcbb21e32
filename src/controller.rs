//! Top-level shade controller
//!
//! Owns the one radio, the one store, the registry and the input dispatch
//! state, so the cooperative loop has a single object to drive:
//! `handle_event` for classified button events, `tick` on every poll, and
//! the accessory-facing surface addressed by channel number. Nothing here is
//! global; the controller is a plain value built from the platform
//! capabilities at startup.

use crate::input::{ButtonEvent, InputController};
use crate::platform::traits::{NvsInterface, PulseTrainInterface, RadioInterface};
use crate::platform::{PlatformError, Result};
use crate::protocol::waveform::RtsTransmitter;
use crate::shade::calibration::{channel_key, ShadeCalibration, RECORD_LEN};
use crate::shade::registry::ShadeRegistry;
use crate::shade::{Shade, ShadeTuning};
use crate::{log_error, log_info, log_warn};

/// Lowest valid RTS channel number
pub const MIN_CHANNEL: u8 = 1;
/// Highest valid RTS channel number
pub const MAX_CHANNEL: u8 = 32;
/// RTS carrier frequency in Hz
pub const DEFAULT_CARRIER_HZ: u32 = 433_420_000;

/// Installation-wide configuration
#[derive(Debug, Clone, Copy)]
pub struct InstallationConfig {
    /// 19-bit installation identifier; channel addresses derive from it
    pub address_seed: u32,
    /// Carrier frequency in Hz
    pub carrier_hz: u32,
}

impl Default for InstallationConfig {
    fn default() -> Self {
        Self {
            address_seed: parse_seed(env!("SOMFY_ADDRESS")),
            carrier_hz: DEFAULT_CARRIER_HZ,
        }
    }
}

/// Parse the build-time address seed ("0x"-prefixed hex or decimal)
fn parse_seed(s: &str) -> u32 {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.unwrap_or(0)
}

/// Per-shade configuration
#[derive(Debug, Clone, Copy)]
pub struct ShadeConfig<'a> {
    /// RTS channel number, 1..=32, unique per installation
    pub channel: u8,
    /// Display name
    pub name: &'a str,
    /// Initial raise transit time, used until the channel is calibrated
    pub raise_time_ms: u32,
    /// Initial lower transit time
    pub lower_time_ms: u32,
    pub tuning: ShadeTuning,
}

impl<'a> ShadeConfig<'a> {
    pub fn new(channel: u8, name: &'a str) -> Self {
        Self {
            channel,
            name,
            raise_time_ms: crate::shade::calibration::DEFAULT_TRAVEL_MS,
            lower_time_ms: crate::shade::calibration::DEFAULT_TRAVEL_MS,
            tuning: ShadeTuning::default(),
        }
    }
}

/// The controller driving every configured shade
pub struct ShadeController<RF, P, S> {
    radio: RtsTransmitter<RF, P>,
    store: S,
    registry: ShadeRegistry,
    input: InputController,
    config: InstallationConfig,
    radio_ready: bool,
}

impl<RF, P, S> ShadeController<RF, P, S>
where
    RF: RadioInterface,
    P: PulseTrainInterface,
    S: NvsInterface,
{
    pub fn new(radio: RF, pulses: P, store: S, config: InstallationConfig) -> Self {
        Self {
            radio: RtsTransmitter::new(radio, pulses),
            store,
            registry: ShadeRegistry::new(),
            input: InputController::new(),
            config,
            radio_ready: false,
        }
    }

    /// Initialize the transceiver and program the carrier
    ///
    /// Until this succeeds every transmitting operation fails with
    /// `ResourceUnavailable`: configured shades must not be claimed
    /// controllable with a dead radio.
    pub fn init_radio(&mut self) -> Result<()> {
        match self.radio.init(self.config.carrier_hz) {
            Ok(()) => {
                self.radio_ready = true;
                log_info!(
                    "radio ready, installation seed {}",
                    self.config.address_seed & 0x7FFFF
                );
                Ok(())
            }
            Err(e) => {
                self.radio_ready = false;
                log_error!("RF transceiver not responding; shades are not controllable");
                Err(e)
            }
        }
    }

    pub fn is_radio_ready(&self) -> bool {
        self.radio_ready
    }

    /// Register one shade
    ///
    /// Loads the channel's persisted calibration, initializing and
    /// persisting defaults on first use. Rejected configurations leave the
    /// rest of the system running.
    pub fn register_shade(&mut self, config: &ShadeConfig<'_>) -> Result<()> {
        if !(MIN_CHANNEL..=MAX_CHANNEL).contains(&config.channel) {
            log_warn!(
                "channel {} out of range, cannot create shade",
                config.channel
            );
            return Err(PlatformError::InvalidConfig);
        }
        if self.registry.by_channel(config.channel).is_some() {
            log_warn!(
                "channel {} already used, cannot create shade",
                config.channel
            );
            return Err(PlatformError::InvalidConfig);
        }

        let key = channel_key(config.channel);
        let calibration = self.load_or_init_calibration(key.as_str(), config);

        let address = (self.config.address_seed & 0x7FFFF) * 32 + config.channel as u32;
        log_info!(
            "configuring shade {} address {} rc {}",
            config.channel,
            address,
            calibration.rolling_code
        );

        self.registry.register(Shade::new(
            config.channel,
            address,
            config.name,
            calibration,
            config.tuning,
        ))
    }

    fn load_or_init_calibration(&mut self, key: &str, config: &ShadeConfig<'_>) -> ShadeCalibration {
        let defaults = ShadeCalibration {
            raise_time_ms: config.raise_time_ms,
            lower_time_ms: config.lower_time_ms,
            ..ShadeCalibration::default()
        };

        let mut buf = [0u8; RECORD_LEN];
        match self.store.load(key, &mut buf) {
            Ok(Some(len)) => match ShadeCalibration::from_bytes(&buf[..len]) {
                Some(calibration) => calibration,
                None => {
                    log_warn!("channel {}: stored record malformed, using defaults", config.channel);
                    defaults
                }
            },
            Ok(None) => {
                // First use of this channel: persist the defaults right away
                // so the rolling code floor survives an early power loss.
                if self.store.save(key, &defaults.to_bytes()).is_err() {
                    log_error!("channel {}: failed to persist initial calibration", config.channel);
                }
                defaults
            }
            Err(_) => {
                log_error!("channel {}: calibration store unreadable, using defaults", config.channel);
                defaults
            }
        }
    }

    /// Advance every shade's position model; call every 10-50 ms
    ///
    /// Per-shade errors are reported but do not stop the remaining shades
    /// from ticking; the first error is returned.
    pub fn tick(&mut self, now_ms: u64) -> Result<()> {
        let mut first_error = Ok(());
        for shade in self.registry.iter_mut() {
            let result = shade.tick(now_ms, &mut self.radio, &mut self.store);
            if result.is_err() && first_error.is_ok() {
                first_error = result;
            }
        }
        first_error
    }

    /// Feed one classified button event into the dispatch machine
    pub fn handle_event(&mut self, event: ButtonEvent, now_ms: u64) -> Result<()> {
        if !self.radio_ready {
            return Err(PlatformError::ResourceUnavailable);
        }
        self.input.dispatch(
            event,
            now_ms,
            &mut self.registry,
            &mut self.radio,
            &mut self.store,
        )
    }

    /// Accessory surface: command a target position
    pub fn set_target_position(&mut self, channel: u8, position: f32, now_ms: u64) -> Result<()> {
        if !self.radio_ready {
            return Err(PlatformError::ResourceUnavailable);
        }
        let shade = self
            .registry
            .by_channel_mut(channel)
            .ok_or(PlatformError::InvalidConfig)?;
        shade.set_target(position, now_ms, &mut self.radio, &mut self.store)
    }

    /// Accessory surface: last committed position
    pub fn current_position(&self, channel: u8) -> Option<f32> {
        self.registry
            .by_channel(channel)
            .map(|s| s.current_position())
    }

    /// Accessory surface: commanded target
    pub fn target_position(&self, channel: u8) -> Option<f32> {
        self.registry
            .by_channel(channel)
            .map(|s| s.target_position())
    }

    /// Accessory surface: selected-indicator flag
    pub fn indicator(&self, channel: u8) -> Option<bool> {
        self.registry.by_channel(channel).map(|s| s.indicator())
    }

    /// Pair a channel with its receiver
    pub fn program(&mut self, channel: u8) -> Result<()> {
        if !self.radio_ready {
            return Err(PlatformError::ResourceUnavailable);
        }
        let shade = self
            .registry
            .by_channel_mut(channel)
            .ok_or(PlatformError::InvalidConfig)?;
        shade.program(&mut self.radio, &mut self.store)
    }

    /// Erase every persisted calibration record
    ///
    /// Destructive; a restart is required before defaults re-initialize.
    pub fn erase_all(&mut self) -> Result<()> {
        self.store.erase_all()?;
        log_warn!("all shade calibration data erased, restart required");
        Ok(())
    }

    pub fn registry(&self) -> &ShadeRegistry {
        &self.registry
    }

    /// Transmitter handle (waveform inspection in tests)
    pub fn transmitter(&self) -> &RtsTransmitter<RF, P> {
        &self.radio
    }

    /// Store handle (record inspection in tests)
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
