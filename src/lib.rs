#![cfg_attr(not(test), no_std)]

//! somfy-rts - Open-loop driver for Somfy RTS motorized window shades
//!
//! This library provides the RTS frame codec and waveform builder, a
//! velocity-based position model per shade, rolling-code persistence, and
//! the three-button manual control layer. All hardware access goes through
//! the platform traits; mock implementations are provided for host testing.

#[cfg(all(feature = "mock", not(test)))]
extern crate std;

// Platform abstraction layer (capability traits + mock implementations)
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Core systems (logging facade)
pub mod core;

// RTS frame codec and pulse-train builder
pub mod protocol;

// Per-shade position model, calibration record, registry
pub mod shade;

// Button classification and multi-shade manual control
pub mod input;

// Top-level controller owning radio, store, registry and input dispatch
pub mod controller;

pub use controller::{InstallationConfig, ShadeConfig, ShadeController};
