//! Button debounce and gesture classification
//!
//! Turns raw pressed/released level samples into debounced edges and one
//! classified gesture per press sequence: Long while still held, Double on
//! the second press inside the double-click window, Single once that window
//! closes. Thresholds are policy, not protocol, and can be tuned per
//! button.

use super::{ButtonAction, ButtonEvent, ButtonId, PressKind};
use heapless::Vec;

/// Classification thresholds (milliseconds)
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Raw level must hold this long before an edge is accepted
    pub debounce_ms: u64,
    /// Held at least this long fires a Long press
    pub long_press_ms: u64,
    /// A second press within this window of release fires a Double
    pub double_click_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 5,
            long_press_ms: 2_000,
            double_click_ms: 200,
        }
    }
}

impl ClassifierConfig {
    /// Default thresholds with a different long-press time
    pub fn with_long_press(long_press_ms: u64) -> Self {
        Self {
            long_press_ms,
            ..Self::default()
        }
    }
}

/// Where the current press sequence stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Stable released, nothing pending
    Idle,
    /// First press held, Long not yet fired
    FirstHold,
    /// Long fired, waiting for release
    LongFired,
    /// Released after a short first press, waiting for a second press
    DoubleWindow,
    /// Second press held, Double already fired
    SecondHold,
}

/// Debounce and gesture state for one physical button
#[derive(Debug)]
pub struct ButtonClassifier {
    config: ClassifierConfig,
    raw: bool,
    raw_since_ms: u64,
    stable: bool,
    pressed_at_ms: u64,
    released_at_ms: u64,
    phase: Phase,
}

impl ButtonClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            raw: false,
            raw_since_ms: 0,
            stable: false,
            pressed_at_ms: 0,
            released_at_ms: 0,
            phase: Phase::Idle,
        }
    }

    /// Feed one raw level sample; returns at most one action
    ///
    /// Call at the polling rate. `raw_pressed` is the electrical state,
    /// `true` while the button is down.
    pub fn update(&mut self, raw_pressed: bool, now_ms: u64) -> Option<ButtonAction> {
        if raw_pressed != self.raw {
            self.raw = raw_pressed;
            self.raw_since_ms = now_ms;
        }

        if self.raw != self.stable
            && now_ms.saturating_sub(self.raw_since_ms) >= self.config.debounce_ms
        {
            self.stable = self.raw;
            return if self.stable {
                self.on_press(now_ms)
            } else {
                self.on_release()
            };
        }

        match self.phase {
            Phase::FirstHold
                if self.stable
                    && now_ms.saturating_sub(self.pressed_at_ms) >= self.config.long_press_ms =>
            {
                self.phase = Phase::LongFired;
                Some(ButtonAction::Classified(PressKind::Long))
            }
            Phase::DoubleWindow
                if now_ms.saturating_sub(self.released_at_ms) > self.config.double_click_ms =>
            {
                self.phase = Phase::Idle;
                Some(ButtonAction::Classified(PressKind::Single))
            }
            _ => None,
        }
    }

    fn on_press(&mut self, now_ms: u64) -> Option<ButtonAction> {
        match self.phase {
            Phase::DoubleWindow => {
                self.phase = Phase::SecondHold;
                Some(ButtonAction::Classified(PressKind::Double))
            }
            _ => {
                self.phase = Phase::FirstHold;
                self.pressed_at_ms = now_ms;
                Some(ButtonAction::Pressed)
            }
        }
    }

    fn on_release(&mut self) -> Option<ButtonAction> {
        match self.phase {
            Phase::FirstHold => {
                self.phase = Phase::DoubleWindow;
                self.released_at_ms = self.raw_since_ms;
            }
            _ => self.phase = Phase::Idle,
        }
        Some(ButtonAction::Released)
    }
}

/// The three-button panel: one classifier per button, polled together
///
/// The My button uses a shorter long-press threshold than Up/Down, matching
/// the reference remote behavior.
#[derive(Debug)]
pub struct ButtonPanel {
    up: ButtonClassifier,
    my: ButtonClassifier,
    down: ButtonClassifier,
}

impl ButtonPanel {
    pub fn new() -> Self {
        Self {
            up: ButtonClassifier::new(ClassifierConfig::default()),
            my: ButtonClassifier::new(ClassifierConfig::with_long_press(1_000)),
            down: ButtonClassifier::new(ClassifierConfig::default()),
        }
    }

    /// Feed one sample per button; returns the events that fired this poll
    pub fn poll(
        &mut self,
        up_raw: bool,
        my_raw: bool,
        down_raw: bool,
        now_ms: u64,
    ) -> Vec<ButtonEvent, 3> {
        let mut events = Vec::new();
        for (button, action) in [
            (ButtonId::Up, self.up.update(up_raw, now_ms)),
            (ButtonId::My, self.my.update(my_raw, now_ms)),
            (ButtonId::Down, self.down.update(down_raw, now_ms)),
        ] {
            if let Some(action) = action {
                let _ = events.push(ButtonEvent { button, action });
            }
        }
        events
    }
}

impl Default for ButtonPanel {
    fn default() -> Self {
        Self::new()
    }
}
