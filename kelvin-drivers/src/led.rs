//! Status LEDs
//!
//! A single LED on a GPIO pin, either active-high or active-low, and a
//! green/red pair that blinks the colour of the last measurement result:
//! 50 ms on in every 200 ms period.

use embedded_hal::digital::OutputPin;

/// Blink period
pub const BLINK_PERIOD_MS: u32 = 200;
/// On time within each period
pub const BLINK_ON_MS: u32 = 50;

/// LED on a GPIO pin
pub struct Led<P> {
    pin: P,
    /// If true, LED ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> Led<P> {
    /// Create an LED that starts off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            inverted,
            on: true,
        };
        led.set(false);
        led
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Switch the LED
    ///
    /// A failed pin write leaves the state unchanged, so the next call
    /// retries it.
    pub fn set(&mut self, on: bool) {
        if on == self.on {
            return;
        }
        let written = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if written.is_ok() {
            self.on = on;
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// Whether a blinking LED is lit at `now_ms`
pub const fn blink_phase(now_ms: u32) -> bool {
    now_ms % BLINK_PERIOD_MS < BLINK_ON_MS
}

/// Green/red status pair
pub struct StatusLed<G, R> {
    green: Led<G>,
    red: Led<R>,
}

impl<G: OutputPin, R: OutputPin> StatusLed<G, R> {
    pub fn new(green: Led<G>, red: Led<R>) -> Self {
        Self { green, red }
    }

    /// Drive the pair for the current time
    ///
    /// Only the LED for the current state blinks; the other stays off.
    pub fn update(&mut self, now_ms: u32, healthy: bool) {
        let lit = blink_phase(now_ms);
        if healthy {
            self.red.set(false);
            self.green.set(lit);
        } else {
            self.green.set(false);
            self.red.set(lit);
        }
    }

    pub fn off(&mut self) {
        self.green.set(false);
        self.red.set(false);
    }
}
