//! Display task
//!
//! Owns the OLED. Renders each screen the meter publishes into the
//! framebuffer and flushes it to the panel.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;

use kelvin_display::{GraphicsBackend, Screen};
use kelvin_drivers::display::Sh1106;

use crate::channels::SCREEN;

/// SH1106 on I2C0
pub type Oled = Sh1106<I2c<'static, I2C0, Async>>;

#[embassy_executor::task]
pub async fn display_task(oled: Oled, contrast: u8) {
    info!("Display task started");

    let mut backend = GraphicsBackend::new(oled);
    if let Err(e) = backend.target_mut().init(contrast).await {
        warn!("OLED init failed: {:?}", e);
    }

    let mut shown = Screen::new();

    loop {
        let screen = SCREEN.wait().await;

        // repeated no-data screens need no redraw
        if !shown.is_dirty() && screen.items() == shown.items() {
            continue;
        }

        if let Err(e) = screen.render(&mut backend) {
            warn!("Render failed: {:?}", e);
            continue;
        }
        match backend.target_mut().flush().await {
            Ok(()) => {
                shown = screen;
                shown.mark_clean();
            }
            Err(e) => warn!("OLED flush failed: {:?}", e),
        }
    }
}
