//! Inter-task communication
//!
//! The meter task publishes finished screens and the status LED state;
//! the display and LED tasks only read them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU8, Ordering};

use kelvin_display::Screen;

/// Next screen to draw; a newer screen replaces one not yet drawn
pub static SCREEN: Signal<CriticalSectionRawMutex, Screen> = Signal::new();

static STATUS: AtomicU8 = AtomicU8::new(LedState::Off as u8);

/// What the green/red LED pair shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LedState {
    Off = 0,
    /// Green blink
    Healthy = 1,
    /// Red blink
    Unhealthy = 2,
}

impl LedState {
    pub fn load() -> Self {
        match STATUS.load(Ordering::Relaxed) {
            1 => LedState::Healthy,
            2 => LedState::Unhealthy,
            _ => LedState::Off,
        }
    }

    pub fn store(self) {
        STATUS.store(self as u8, Ordering::Relaxed);
    }
}
