//! Shade registry
//!
//! Ordered, channel-unique collection of shades plus the cyclic selection
//! index used by the manual button control. The registry is a plain owned
//! value; nothing in the crate holds global shade state.

use super::Shade;
use crate::platform::{PlatformError, Result};
use heapless::Vec;

/// Maximum number of shades (one per RTS channel)
pub const MAX_SHADES: usize = 32;

/// Ordered shade collection with a selected index
#[derive(Default)]
pub struct ShadeRegistry {
    shades: Vec<Shade, MAX_SHADES>,
    selected: usize,
}

impl ShadeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shade
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if the channel is already
    /// registered or the registry is full.
    pub fn register(&mut self, shade: Shade) -> Result<()> {
        if self.by_channel(shade.channel()).is_some() {
            return Err(PlatformError::InvalidConfig);
        }
        self.shades
            .push(shade)
            .map_err(|_| PlatformError::InvalidConfig)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.shades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shades.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shade> {
        self.shades.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shade> {
        self.shades.iter_mut()
    }

    pub fn by_channel(&self, channel: u8) -> Option<&Shade> {
        self.shades.iter().find(|s| s.channel() == channel)
    }

    pub fn by_channel_mut(&mut self, channel: u8) -> Option<&mut Shade> {
        self.shades.iter_mut().find(|s| s.channel() == channel)
    }

    /// Currently selected shade (manual control target)
    pub fn selected(&self) -> Option<&Shade> {
        self.shades.get(self.selected)
    }

    pub fn selected_mut(&mut self) -> Option<&mut Shade> {
        self.shades.get_mut(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Advance the selection cyclically
    pub fn advance_selection(&mut self) {
        if !self.shades.is_empty() {
            self.selected = (self.selected + 1) % self.shades.len();
        }
    }
}
