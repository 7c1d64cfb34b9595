//! Status LED task

use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use kelvin_drivers::led::StatusLed;

use super::meter::now_ms;
use crate::channels::LedState;

/// Green/red pair
pub type StatusLeds = StatusLed<Output<'static>, Output<'static>>;

/// Fine enough for the 50 ms blink
const UPDATE_INTERVAL_MS: u64 = 10;

#[embassy_executor::task]
pub async fn led_task(mut leds: StatusLeds) {
    let mut ticker = Ticker::every(Duration::from_millis(UPDATE_INTERVAL_MS));

    loop {
        ticker.next().await;
        match LedState::load() {
            LedState::Off => leds.off(),
            LedState::Healthy => leds.update(now_ms(), true),
            LedState::Unhealthy => leds.update(now_ms(), false),
        }
    }
}
