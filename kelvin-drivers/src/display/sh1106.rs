//! SH1106 OLED Display Driver
//!
//! Driver for 128x64 SH1106-based OLED displays via I2C. Drawing goes to
//! a page-organised framebuffer through `embedded-graphics`; `flush`
//! sends it to the panel one page at a time.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use embedded_hal_async::i2c::I2c;
use kelvin_hal::I2cConfig;

/// SH1106 I2C address (typically 0x3C or 0x3D)
pub const SH1106_ADDR: u8 = 0x3C;

/// Bus settings the panel needs
pub const I2C_CONFIG: I2cConfig = I2cConfig::FAST;

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// The controller RAM is 132 columns wide; the panel starts at column 2
const COLUMN_OFFSET: u8 = 2;

/// SH1106 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    /// Frame buffer (1 bit per pixel, organized as pages)
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C: I2c> Sh1106<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Initialize the display with the given contrast
    pub async fn init(&mut self, contrast: u8) -> Result<(), I2C::Error> {
        let init_cmds: [u8; 22] = [
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            contrast,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for c in init_cmds {
            self.command(c).await?;
        }
        Ok(())
    }

    async fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(SH1106_ADDR, &[CONTROL_COMMAND, cmd]).await
    }

    /// Send the frame buffer to the panel
    pub async fn flush(&mut self) -> Result<(), I2C::Error> {
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8).await?;
            self.command(cmd::SET_LOW_COLUMN | (COLUMN_OFFSET & 0x0F))
                .await?;
            self.command(cmd::SET_HIGH_COLUMN | (COLUMN_OFFSET >> 4))
                .await?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c.write(SH1106_ADDR, &data).await?;
        }
        Ok(())
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let bit = 1 << (y % 8);
        let byte = &mut self.buffer[y / 8][x];
        if on {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.buffer[y / 8][x] & (1 << (y % 8)) != 0
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C: I2c> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as usize, point.y as usize, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        for page in self.buffer.iter_mut() {
            page.fill(fill);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_hal_async::i2c::{ErrorType, Operation};

    #[derive(Default)]
    struct MockI2c {
        writes: Vec<Vec<u8>>,
    }

    impl ErrorType for MockI2c {
        type Error = Infallible;
    }

    impl I2c for MockI2c {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Infallible> {
            assert_eq!(address, SH1106_ADDR);
            for op in operations.iter_mut() {
                if let Operation::Write(bytes) = op {
                    self.writes.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_init_applies_contrast() {
        let mut oled = Sh1106::new(MockI2c::default());
        block_on(oled.init(0x40)).unwrap();
        let bus = oled.release();
        let cmds: Vec<u8> = bus.writes.iter().map(|w| w[1]).collect();
        let pos = cmds.iter().position(|&c| c == cmd::SET_CONTRAST).unwrap();
        assert_eq!(cmds[pos + 1], 0x40);
        assert_eq!(cmds.last(), Some(&cmd::DISPLAY_ON));
    }

    #[test]
    fn test_draw_target_sets_page_bits() {
        let mut oled = Sh1106::new(MockI2c::default());
        Pixel(Point::new(3, 9), BinaryColor::On)
            .draw(&mut oled)
            .unwrap();
        assert!(oled.pixel(3, 9));
        assert!(!oled.pixel(3, 8));
        assert_eq!(oled.buffer[1][3], 0b0000_0010);

        // off-panel pixels are dropped
        Pixel(Point::new(-1, 200), BinaryColor::On)
            .draw(&mut oled)
            .unwrap();
    }

    #[test]
    fn test_fill_and_clear() {
        let mut oled = Sh1106::new(MockI2c::default());
        Rectangle::new(Point::new(0, 0), Size::new(128, 64))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut oled)
            .unwrap();
        assert!(oled.buffer.iter().all(|p| p.iter().all(|&b| b == 0xFF)));

        oled.clear(BinaryColor::Off).unwrap();
        assert!(!oled.pixel(64, 32));
    }

    #[test]
    fn test_flush_writes_every_page_at_offset() {
        let mut oled = Sh1106::new(MockI2c::default());
        oled.set_pixel(0, 63, true);
        block_on(oled.flush()).unwrap();

        let bus = oled.release();
        // page addr, low column, high column, data per page
        assert_eq!(bus.writes.len(), PAGES * 4);
        assert_eq!(bus.writes[0], [0x00, 0xB0]);
        assert_eq!(bus.writes[1], [0x00, 0x02]);
        assert_eq!(bus.writes[2], [0x00, 0x10]);

        let last_page = &bus.writes[PAGES * 4 - 1];
        assert_eq!(last_page.len(), WIDTH + 1);
        assert_eq!(last_page[0], CONTROL_DATA);
        assert_eq!(last_page[1], 0x80);
    }
}
