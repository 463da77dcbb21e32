//! Per-shade position model and state machine
//!
//! A shade is driven entirely open-loop: position is inferred from elapsed
//! time and the calibrated full-travel durations, never measured. The model
//! is a straight line: `position(t) = current + velocity * (t -
//! motion_start)`, with `velocity = ±100 / transit_time`. Commands re-anchor
//! the line; `tick` watches for the projection crossing the target.

pub mod calibration;
pub mod registry;

use crate::platform::traits::{NvsInterface, PulseTrainInterface, RadioInterface};
use crate::platform::{PlatformError, Result};
use crate::protocol::frame::{self, Command};
use crate::protocol::waveform::RtsTransmitter;
use crate::{log_error, log_info};
use calibration::{channel_key, ChannelKey, ShadeCalibration};
use heapless::String;

/// Maximum display-name length
pub const NAME_LEN: usize = 24;

/// Tunable model constants
///
/// These preserve the behavior of the reference hardware build (full-travel
/// commands overshoot the nominal end position; a recalibration run gets a
/// generous placeholder transit time) without baking the exact numbers into
/// the protocol.
#[derive(Debug, Clone, Copy)]
pub struct ShadeTuning {
    /// Extra travel commanded past a target of exactly 0 or 100, in
    /// position units, so the physical end stop is always reached despite
    /// estimation drift
    pub full_travel_overshoot: f32,
    /// Placeholder transit time while a recalibration run is in progress,
    /// milliseconds
    pub recalibration_travel_ms: u32,
}

impl Default for ShadeTuning {
    fn default() -> Self {
        Self {
            full_travel_overshoot: 20.0,
            recalibration_travel_ms: 120_000,
        }
    }
}

/// Current motion state, derived from the velocity sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    Idle,
    Raising,
    Lowering,
}

/// Travel direction for recalibration runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TravelDirection {
    Raise,
    Lower,
}

/// One motorized shade on one RTS channel
pub struct Shade {
    channel: u8,
    address: u32,
    key: ChannelKey,
    name: String<NAME_LEN>,
    calibration: ShadeCalibration,
    /// Position anchor of the current motion line, [0, 100]
    current: f32,
    /// Commanded target, [0, 100]
    target: f32,
    /// Position units per millisecond; zero iff idle
    velocity: f32,
    motion_start_ms: u64,
    recalibrating: bool,
    selected: bool,
    tuning: ShadeTuning,
}

impl Shade {
    /// Create a shade from already-loaded calibration
    ///
    /// Channel validation and calibration loading happen in the controller;
    /// the shade itself is pure state.
    pub fn new(
        channel: u8,
        address: u32,
        name: &str,
        calibration: ShadeCalibration,
        tuning: ShadeTuning,
    ) -> Self {
        let mut owned_name = String::new();
        for c in name.chars() {
            if owned_name.push(c).is_err() {
                break;
            }
        }
        Self {
            channel,
            address,
            key: channel_key(channel),
            name: owned_name,
            calibration,
            current: 0.0,
            target: 0.0,
            velocity: 0.0,
            motion_start_ms: 0,
            recalibrating: false,
            selected: false,
            tuning,
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn calibration(&self) -> &ShadeCalibration {
        &self.calibration
    }

    /// Position anchor last committed to the model
    pub fn current_position(&self) -> f32 {
        self.current
    }

    pub fn target_position(&self) -> f32 {
        self.target
    }

    pub fn motion(&self) -> Motion {
        if self.velocity > 0.0 {
            Motion::Raising
        } else if self.velocity < 0.0 {
            Motion::Lowering
        } else {
            Motion::Idle
        }
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != 0.0
    }

    pub fn is_recalibrating(&self) -> bool {
        self.recalibrating
    }

    /// Selected-indicator flag (exposed to the accessory layer)
    pub fn indicator(&self) -> bool {
        self.selected
    }

    pub fn set_indicator(&mut self, on: bool) {
        self.selected = on;
    }

    /// Estimated position at `now_ms`, clamped to the travel range
    pub fn estimated_position(&self, now_ms: u64) -> f32 {
        let dt = now_ms.saturating_sub(self.motion_start_ms) as f32;
        (self.current + self.velocity * dt).clamp(0.0, 100.0)
    }

    /// Command the shade toward a target position
    ///
    /// Starts a raise or lower as needed. When the shade is already moving
    /// toward the target only the stored target changes; repeated calls
    /// while converging must not spam RF transmissions.
    ///
    /// A storage error means the frame was transmitted but the rolling code
    /// could not be persisted: motion bookkeeping proceeds and the error is
    /// surfaced. Any other error aborted the transmission and the model is
    /// left untouched.
    pub fn set_target<RF, P, S>(
        &mut self,
        target: f32,
        now_ms: u64,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        let target = target.clamp(0.0, 100.0);
        let estimated = self.estimated_position(now_ms);
        self.target = target;

        if target > estimated && self.velocity <= 0.0 {
            self.start_motion(Command::Raise, estimated, now_ms, radio, store)
        } else if target < estimated && self.velocity >= 0.0 {
            self.start_motion(Command::Lower, estimated, now_ms, radio, store)
        } else {
            Ok(())
        }
    }

    fn start_motion<RF, P, S>(
        &mut self,
        command: Command,
        from: f32,
        now_ms: u64,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        let result = self.transmit(command, radio, store);
        if let Err(e) = result {
            if !matches!(e, PlatformError::Storage(_)) {
                // Nothing went on air; the shade is not moving.
                return Err(e);
            }
        }

        self.current = from;
        self.velocity = match command {
            Command::Raise => 100.0 / self.calibration.raise_time_ms as f32,
            _ => -100.0 / self.calibration.lower_time_ms as f32,
        };
        self.motion_start_ms = now_ms;
        result
    }

    /// Advance the position model; called from the polling loop
    ///
    /// A target of exactly 100 is chased to `100 + overshoot` and a target
    /// of exactly 0 to `-overshoot`, so full-travel commands keep the motor
    /// running slightly past the nominal end position. On crossing the
    /// bound: mid-range targets get a Stop frame; at the end stops the
    /// shade's own limiter is trusted and no Stop is sent. Either way the
    /// position snaps to the target, the shade goes idle, and any
    /// in-progress recalibration is abandoned.
    pub fn tick<RF, P, S>(
        &mut self,
        now_ms: u64,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        if self.velocity == 0.0 {
            return Ok(());
        }

        let dt = now_ms.saturating_sub(self.motion_start_ms) as f32;
        // Unclamped on purpose: the projection must be able to run past the
        // end stop to cross the widened bound.
        let estimated = self.current + self.velocity * dt;

        let mut bound = self.target;
        if self.target == 100.0 {
            bound += self.tuning.full_travel_overshoot;
        } else if self.target == 0.0 {
            bound -= self.tuning.full_travel_overshoot;
        }

        let crossed = (self.velocity > 0.0 && estimated > bound)
            || (self.velocity < 0.0 && estimated < bound);
        if !crossed {
            return Ok(());
        }

        let result = if bound > 100.0 {
            log_info!("shade {}: fully open", self.channel);
            Ok(())
        } else if bound < 0.0 {
            log_info!("shade {}: fully closed", self.channel);
            Ok(())
        } else {
            self.transmit(Command::Stop, radio, store)
        };

        self.current = self.target;
        self.velocity = 0.0;
        self.recalibrating = false;
        result
    }

    /// Re-target to the current estimate so the next `tick` issues a Stop
    ///
    /// Manual stop/override while moving; also the commit path's sibling
    /// for non-recalibrating motion.
    pub fn stop_here(&mut self, now_ms: u64) {
        self.target = self.estimated_position(now_ms);
    }

    /// Start a recalibration run toward an end stop
    ///
    /// The affected transit time becomes a generous placeholder so the
    /// motor keeps driving well past any plausible real travel; the user
    /// ends the run with [`Shade::commit_recalibration`] once the shade
    /// physically reaches the extreme.
    pub fn begin_recalibration<RF, P, S>(
        &mut self,
        direction: TravelDirection,
        now_ms: u64,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        self.recalibrating = true;
        match direction {
            TravelDirection::Raise => {
                self.calibration.raise_time_ms = self.tuning.recalibration_travel_ms;
                log_info!("shade {}: learning raise time", self.channel);
                self.set_target(100.0, now_ms, radio, store)
            }
            TravelDirection::Lower => {
                self.calibration.lower_time_ms = self.tuning.recalibration_travel_ms;
                log_info!("shade {}: learning lower time", self.channel);
                self.set_target(0.0, now_ms, radio, store)
            }
        }
    }

    /// Commit the elapsed motion time as the new calibrated transit time
    ///
    /// Called at the instant the user observes the shade reaching the
    /// extreme. Persists the learned time, clears the recalibration flag
    /// and settles the model at the target without transmitting (the shade
    /// was already stopped by its end-stop limiter).
    pub fn commit_recalibration<S>(&mut self, now_ms: u64, store: &mut S) -> Result<()>
    where
        S: NvsInterface,
    {
        let elapsed = now_ms.saturating_sub(self.motion_start_ms) as u32;
        if self.velocity > 0.0 {
            self.calibration.raise_time_ms = elapsed;
            log_info!("shade {}: raise time set to {} ms", self.channel, elapsed);
        } else {
            self.calibration.lower_time_ms = elapsed;
            log_info!("shade {}: lower time set to {} ms", self.channel, elapsed);
        }

        self.recalibrating = false;
        self.current = self.target;
        self.velocity = 0.0;
        self.persist(store)
    }

    /// Pair this channel with a receiver
    ///
    /// Transmits the Program command; position state is untouched.
    pub fn program<RF, P, S>(
        &mut self,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        self.transmit(Command::Program, radio, store)
    }

    /// Encode and transmit one frame, then persist the advanced rolling code
    ///
    /// The code on the wire is the freshly incremented value. A radio error
    /// takes precedence (nothing went on air); a storage error is reported
    /// after the fact since the frame is already out.
    fn transmit<RF, P, S>(
        &mut self,
        command: Command,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        self.calibration.rolling_code = self.calibration.rolling_code.wrapping_add(1);
        log_info!(
            "shade {}: {} rc={}",
            self.channel,
            command.label(),
            self.calibration.rolling_code
        );

        let frame = frame::encode(self.address, self.calibration.rolling_code, command);
        let sent = radio.send(&frame);
        let saved = self.persist(store);
        sent.and(saved)
    }

    fn persist<S>(&self, store: &mut S) -> Result<()>
    where
        S: NvsInterface,
    {
        store
            .save(self.key.as_str(), &self.calibration.to_bytes())
            .map_err(|e| {
                // Losing a rolling code risks desynchronizing the receiver's
                // acceptance window after the next reboot.
                log_error!(
                    "shade {}: calibration not persisted, rc={}",
                    self.channel,
                    self.calibration.rolling_code
                );
                e
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockNvs, MockPulseTrain, MockRadio};
    use crate::platform::traits::NvsInterface;
    use crate::protocol::frame::decode;

    type TestRadio = RtsTransmitter<MockRadio, MockPulseTrain>;

    fn radio() -> TestRadio {
        RtsTransmitter::new(MockRadio::new(), MockPulseTrain::new())
    }

    fn shade() -> Shade {
        Shade::new(
            7,
            (0x12345 & 0x7FFFF) * 32 + 7,
            "Kitchen",
            ShadeCalibration::default(),
            ShadeTuning::default(),
        )
    }

    fn commands_sent(radio: &TestRadio) -> Vec<Command> {
        (0..radio.pulse_train().transmissions().len())
            .map(|i| {
                let payload = radio.pulse_train().payload(i).unwrap();
                decode(&payload).unwrap().command
            })
            .collect()
    }

    #[test]
    fn full_raise_converges_without_stop_frame() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        shade.set_target(100.0, 0, &mut radio, &mut store).unwrap();
        assert_eq!(shade.motion(), Motion::Raising);

        let mut now = 0;
        while now <= 13_000 {
            now += 50;
            shade.tick(now, &mut radio, &mut store).unwrap();
        }

        assert_eq!(shade.current_position(), 100.0);
        assert_eq!(shade.motion(), Motion::Idle);
        // One Raise, no Stop: the end-stop limiter is trusted.
        assert_eq!(commands_sent(&radio), vec![Command::Raise]);
    }

    #[test]
    fn mid_range_target_gets_exactly_one_stop() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        shade.set_target(50.0, 0, &mut radio, &mut store).unwrap();

        let mut now = 0;
        while now <= 8_000 {
            now += 50;
            shade.tick(now, &mut radio, &mut store).unwrap();
        }

        assert_eq!(shade.current_position(), 50.0);
        assert_eq!(shade.motion(), Motion::Idle);
        assert_eq!(commands_sent(&radio), vec![Command::Raise, Command::Stop]);
    }

    #[test]
    fn repeated_target_set_is_idempotent() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        shade.set_target(100.0, 0, &mut radio, &mut store).unwrap();
        shade
            .set_target(100.0, 1_000, &mut radio, &mut store)
            .unwrap();

        assert_eq!(commands_sent(&radio), vec![Command::Raise]);
    }

    #[test]
    fn reversal_snapshots_position_and_transmits() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        shade.set_target(100.0, 0, &mut radio, &mut store).unwrap();
        // Half-way up, reverse to fully closed.
        shade.set_target(0.0, 5_000, &mut radio, &mut store).unwrap();

        assert_eq!(shade.motion(), Motion::Lowering);
        assert!((shade.current_position() - 50.0).abs() < 1.0);
        assert_eq!(commands_sent(&radio), vec![Command::Raise, Command::Lower]);
    }

    #[test]
    fn rolling_code_advances_by_one_per_frame() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        let start = shade.calibration().rolling_code;
        shade.set_target(30.0, 0, &mut radio, &mut store).unwrap();
        shade.set_target(60.0, 10_000, &mut radio, &mut store).unwrap();

        for i in 0..2u16 {
            let payload = radio.pulse_train().payload(i as usize).unwrap();
            let decoded = decode(&payload).unwrap();
            assert_eq!(decoded.rolling_code, start + 1 + i);
        }
        assert_eq!(shade.calibration().rolling_code, start + 2);
    }

    #[test]
    fn rolling_code_survives_reload() {
        let mut radio = radio();
        let mut store = MockNvs::new();

        let mut shade = shade();
        shade.set_target(100.0, 0, &mut radio, &mut store).unwrap();
        let transmitted = shade.calibration().rolling_code;

        // Simulated reboot: rebuild the shade from the persisted record.
        let mut buf = [0u8; calibration::RECORD_LEN];
        let len = store.load("CH-07", &mut buf).unwrap().unwrap();
        let reloaded = ShadeCalibration::from_bytes(&buf[..len]).unwrap();
        assert_eq!(reloaded.rolling_code, transmitted);

        let mut shade = Shade::new(7, shade.address(), "Kitchen", reloaded, ShadeTuning::default());
        shade.set_target(40.0, 0, &mut radio, &mut store).unwrap();
        assert_eq!(shade.calibration().rolling_code, transmitted + 1);
    }

    #[test]
    fn storage_failure_surfaced_but_motion_starts() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        store.fail_next_save();
        let result = shade.set_target(100.0, 0, &mut radio, &mut store);

        assert!(matches!(result, Err(PlatformError::Storage(_))));
        // The frame went out and the shade is physically moving.
        assert_eq!(radio.pulse_train().transmissions().len(), 1);
        assert_eq!(shade.motion(), Motion::Raising);
    }

    #[test]
    fn radio_failure_aborts_motion() {
        let mut mock_radio = MockRadio::new();
        mock_radio.fail_next_mode_change();
        let mut radio = RtsTransmitter::new(mock_radio, MockPulseTrain::new());
        let mut store = MockNvs::new();
        let mut shade = shade();

        assert!(shade.set_target(100.0, 0, &mut radio, &mut store).is_err());
        assert_eq!(shade.motion(), Motion::Idle);
        assert!(radio.pulse_train().transmissions().is_empty());
    }

    #[test]
    fn recalibration_commits_elapsed_time() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        shade
            .begin_recalibration(TravelDirection::Raise, 1_000, &mut radio, &mut store)
            .unwrap();
        assert!(shade.is_recalibrating());
        assert_eq!(shade.calibration().raise_time_ms, 120_000);

        shade.commit_recalibration(18_500, &mut store).unwrap();

        assert!(!shade.is_recalibrating());
        assert_eq!(shade.calibration().raise_time_ms, 17_500);
        assert_eq!(shade.motion(), Motion::Idle);
        assert_eq!(shade.current_position(), 100.0);

        // Learned time is durable.
        let mut buf = [0u8; calibration::RECORD_LEN];
        let len = store.load("CH-07", &mut buf).unwrap().unwrap();
        let persisted = ShadeCalibration::from_bytes(&buf[..len]).unwrap();
        assert_eq!(persisted.raise_time_ms, 17_500);
    }

    #[test]
    fn overshoot_cancels_recalibration() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();
        // Short placeholder so the run completes quickly in simulation.
        shade.tuning.recalibration_travel_ms = 1_000;

        shade
            .begin_recalibration(TravelDirection::Raise, 0, &mut radio, &mut store)
            .unwrap();
        assert!(shade.is_recalibrating());

        // Never committed: the run crosses the overshoot bound on its own.
        let mut now = 0;
        while now <= 2_000 {
            now += 50;
            shade.tick(now, &mut radio, &mut store).unwrap();
        }

        assert!(!shade.is_recalibrating());
        assert_eq!(shade.current_position(), 100.0);
        assert_eq!(shade.motion(), Motion::Idle);
    }

    #[test]
    fn stop_here_stops_on_next_tick() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        shade.set_target(100.0, 0, &mut radio, &mut store).unwrap();
        shade.stop_here(4_000);
        shade.tick(4_050, &mut radio, &mut store).unwrap();

        assert_eq!(shade.motion(), Motion::Idle);
        assert!((shade.current_position() - 40.0).abs() < 1.0);
        assert_eq!(commands_sent(&radio), vec![Command::Raise, Command::Stop]);
    }

    #[test]
    fn program_leaves_position_alone() {
        let mut radio = radio();
        let mut store = MockNvs::new();
        let mut shade = shade();

        shade.program(&mut radio, &mut store).unwrap();

        assert_eq!(shade.motion(), Motion::Idle);
        assert_eq!(shade.current_position(), 0.0);
        assert_eq!(commands_sent(&radio), vec![Command::Program]);
    }
}
