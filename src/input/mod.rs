//! Multi-shade manual control
//!
//! The three logical buttons (Up, My, Down) drive the selected shade. The
//! non-obvious part is cross-button coordination: holding one direction
//! button while long-pressing the other primes the Program command, and the
//! gesture both buttons were building toward must then be swallowed. That
//! coordination lives in one combined state machine consuming the classified
//! event stream for all buttons together.

pub mod classifier;

pub use classifier::{ButtonClassifier, ButtonPanel, ClassifierConfig};

use crate::platform::traits::{NvsInterface, PulseTrainInterface, RadioInterface};
use crate::platform::Result;
use crate::protocol::waveform::RtsTransmitter;
use crate::shade::registry::ShadeRegistry;
use crate::shade::TravelDirection;
use crate::log_info;
use bitflags::bitflags;

/// Logical button identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Up,
    My,
    Down,
}

/// Gesture classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    Single,
    Double,
    Long,
}

/// One step in a button's event stream
///
/// `Pressed`/`Released` are debounced edges (needed for priming);
/// `Classified` delivers the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    Pressed,
    Released,
    Classified(PressKind),
}

/// A classified event for one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub button: ButtonId,
    pub action: ButtonAction,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct ButtonSet: u8 {
        const UP = 1 << 0;
        const MY = 1 << 1;
        const DOWN = 1 << 2;
    }
}

fn flag(button: ButtonId) -> ButtonSet {
    match button {
        ButtonId::Up => ButtonSet::UP,
        ButtonId::My => ButtonSet::MY,
        ButtonId::Down => ButtonSet::DOWN,
    }
}

/// Combined dispatch state machine for the button panel
#[derive(Debug)]
pub struct InputController {
    /// Buttons currently held (debounced)
    held: ButtonSet,
    /// Buttons whose next pending gesture must be swallowed
    consumed: ButtonSet,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            held: ButtonSet::empty(),
            consumed: ButtonSet::empty(),
        }
    }

    /// Process one button event against the registry
    ///
    /// Transmitting gestures report radio/storage errors; everything else
    /// returns `Ok`.
    pub fn dispatch<RF, P, S>(
        &mut self,
        event: ButtonEvent,
        now_ms: u64,
        registry: &mut ShadeRegistry,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        let this = flag(event.button);
        match event.action {
            ButtonAction::Pressed => {
                self.held.insert(this);
                // A fresh press starts a fresh gesture; nothing stale left
                // to swallow for this button.
                self.consumed.remove(this);
                Ok(())
            }
            ButtonAction::Released => {
                self.held.remove(this);
                Ok(())
            }
            ButtonAction::Classified(kind) => {
                if self.consumed.contains(this) {
                    self.consumed.remove(this);
                    return Ok(());
                }
                self.on_gesture(event.button, kind, now_ms, registry, radio, store)
            }
        }
    }

    fn on_gesture<RF, P, S>(
        &mut self,
        button: ButtonId,
        kind: PressKind,
        now_ms: u64,
        registry: &mut ShadeRegistry,
        radio: &mut RtsTransmitter<RF, P>,
        store: &mut S,
    ) -> Result<()>
    where
        RF: RadioInterface,
        P: PulseTrainInterface,
        S: NvsInterface,
    {
        if let (ButtonId::My, PressKind::Double) = (button, kind) {
            // Cycle the selection once the current one is already indicated;
            // the first double-click only lights the indicator.
            if registry.selected().map(|s| s.indicator()).unwrap_or(false) {
                if let Some(shade) = registry.selected_mut() {
                    shade.set_indicator(false);
                }
                registry.advance_selection();
            }
            if let Some(shade) = registry.selected_mut() {
                shade.set_indicator(true);
                log_info!("shade {}: selected", shade.channel());
            }
            return Ok(());
        }

        let other_direction_held = match button {
            ButtonId::Up => self.held.contains(ButtonSet::DOWN),
            ButtonId::Down => self.held.contains(ButtonSet::UP),
            ButtonId::My => false,
        };

        let Some(shade) = registry.selected_mut() else {
            return Ok(());
        };

        match (button, kind) {
            (ButtonId::Up, PressKind::Long) | (ButtonId::Down, PressKind::Long)
                if other_direction_held =>
            {
                // Primed: both direction buttons down means pairing, and
                // neither button may fire its own pending gesture.
                self.consumed.insert(ButtonSet::UP | ButtonSet::DOWN);
                shade.set_indicator(false);
                shade.program(radio, store)
            }
            (ButtonId::Up, PressKind::Long) => {
                shade.set_indicator(false);
                shade.begin_recalibration(TravelDirection::Raise, now_ms, radio, store)
            }
            (ButtonId::Down, PressKind::Long) => {
                shade.set_indicator(false);
                shade.begin_recalibration(TravelDirection::Lower, now_ms, radio, store)
            }
            (ButtonId::Up, PressKind::Single) if shade.target_position() < 100.0 => {
                shade.set_indicator(false);
                shade.set_target(100.0, now_ms, radio, store)
            }
            (ButtonId::Down, PressKind::Single) if shade.target_position() > 0.0 => {
                shade.set_indicator(false);
                shade.set_target(0.0, now_ms, radio, store)
            }
            (ButtonId::My, PressKind::Single) if shade.is_moving() => {
                shade.set_indicator(false);
                if shade.is_recalibrating() {
                    shade.commit_recalibration(now_ms, store)
                } else {
                    shade.stop_here(now_ms);
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}
