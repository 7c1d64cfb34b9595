//! Cycle plumbing shared by the meter tasks
//!
//! Splash, warm-up, the fixed-interval gate and publishing the reading
//! screen. A measurement cycle itself blocks; only the gate awaits.

use embassy_time::{Instant, Timer};

use kelvin_core::config::MeterConfig;
use kelvin_core::poll::PollTimer;
use kelvin_core::report::display_text;
use kelvin_core::Reading;
use kelvin_display::{Layout, Screen};

use crate::channels::SCREEN;
use crate::config::layout;

/// Firmware version printed in the serial banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Seconds since boot, taken when a diagnostic cycle starts
pub fn uptime_s() -> u32 {
    Instant::now().as_secs() as u32
}

pub struct Meter {
    config: &'static MeterConfig,
    layout: Layout,
    timer: PollTimer,
}

impl Meter {
    pub fn new(config: &'static MeterConfig) -> Self {
        Self {
            config,
            layout: layout(config.display.layout),
            timer: PollTimer::new(config.interval_ms(), now_ms()),
        }
    }

    /// Show the title screen and hold it
    pub async fn splash(&mut self) {
        let display = &self.config.display;
        SCREEN.signal(Screen::splash(
            &self.layout,
            self.config.title(),
            &display.banner,
            &display.accent,
        ));
        Timer::after_millis(self.config.timing.splash_ms as u64).await;
    }

    /// Let the sensor settle after power-up; the first cycle follows
    /// immediately
    pub async fn warm_up(&mut self) {
        Timer::after_millis(self.config.timing.warmup_ms as u64).await;
        let now = now_ms();
        let interval = self.config.interval_ms();
        self.timer = PollTimer::new(interval, now.wrapping_sub(interval));
    }

    /// Wait until the next cycle is due
    pub async fn next_cycle(&mut self) {
        loop {
            let now = now_ms();
            if self.timer.poll(now) {
                return;
            }
            Timer::after_millis(self.timer.remaining_ms(now) as u64).await;
        }
    }

    /// Publish the reading screen for this cycle
    pub fn show(&self, reading: &Reading) {
        let display = &self.config.display;
        let text = display_text(reading, self.config.sensor.no_data_text());
        SCREEN.signal(Screen::reading(
            &self.layout,
            &text,
            reading.is_value(),
            &display.banner,
            &display.accent,
        ));
    }
}
