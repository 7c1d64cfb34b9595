//! `DisplayBackend` over a monochrome `embedded-graphics` draw target
//!
//! Small text uses the 6x10 font and large text the 10x20 font. Drawing
//! only touches the target's buffer; pushing it to the panel is up to the
//! owner of the target.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::backend::{Color, DisplayBackend, DisplayError, TextSize};

fn font(size: TextSize) -> &'static MonoFont<'static> {
    match size {
        TextSize::Small => &FONT_6X10,
        TextSize::Large => &FONT_10X20,
    }
}

fn binary(color: Color) -> BinaryColor {
    if color.is_lit() {
        BinaryColor::On
    } else {
        BinaryColor::Off
    }
}

/// Backend drawing onto any `DrawTarget<Color = BinaryColor>`
pub struct GraphicsBackend<D> {
    target: D,
}

impl<D> GraphicsBackend<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Access the target, e.g. to flush a panel driver
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn release(self) -> D {
        self.target
    }
}

impl<D> DisplayBackend for GraphicsBackend<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn clear(&mut self, color: Color) -> Result<(), DisplayError> {
        self.target
            .clear(binary(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Color,
    ) -> Result<(), DisplayError> {
        let (w, h) = self.dimensions();
        if x >= w || y >= h {
            return Err(DisplayError::InvalidCoordinates);
        }
        Rectangle::new(
            Point::new(x as i32, y as i32),
            Size::new(width as u32, height as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(binary(color)))
        .draw(&mut self.target)
        .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        size: TextSize,
        color: Color,
        text: &str,
    ) -> Result<u16, DisplayError> {
        let style = MonoTextStyle::new(font(size), binary(color));
        let next = Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top)
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)?;
        Ok(next.x.clamp(0, u16::MAX as i32) as u16)
    }

    fn char_width(&self, size: TextSize) -> u16 {
        let font = font(size);
        (font.character_size.width + font.character_spacing) as u16
    }

    /// Nothing to do: the target is flushed by its owner
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        let size = self.target.bounding_box().size;
        (size.width as u16, size.height as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    use crate::layout::Layout;
    use crate::screen::Screen;

    /// 128x64 in-memory panel
    struct Frame {
        pixels: [[bool; 128]; 64],
    }

    impl Frame {
        fn new() -> Self {
            Self {
                pixels: [[false; 128]; 64],
            }
        }

        fn lit_in(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> usize {
            (y0..y1)
                .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                .filter(|&(x, y)| self.pixels[y][x])
                .count()
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            Size::new(128, 64)
        }
    }

    impl DrawTarget for Frame {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
        where
            I: IntoIterator<Item = Pixel<BinaryColor>>,
        {
            for Pixel(p, c) in pixels {
                if (0..128).contains(&p.x) && (0..64).contains(&p.y) {
                    self.pixels[p.y as usize][p.x as usize] = c.is_on();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_dimensions_and_char_width() {
        let backend = GraphicsBackend::new(Frame::new());
        assert_eq!(backend.dimensions(), (128, 64));
        assert_eq!(backend.char_width(TextSize::Small), 6);
        assert_eq!(backend.char_width(TextSize::Large), 10);
    }

    #[test]
    fn test_draw_text_returns_next_x() {
        let mut backend = GraphicsBackend::new(Frame::new());
        let next = backend
            .draw_text(4, 0, TextSize::Small, Color::White, "YR")
            .unwrap();
        assert_eq!(next, 16);
        assert!(backend.target_mut().lit_in(4, 0, 16, 10) > 0);
    }

    #[test]
    fn test_render_clears_previous_reading() {
        let mut backend = GraphicsBackend::new(Frame::new());
        let layout = Layout::OLED_128X64;

        Screen::reading(&layout, "100.00C", true, "YR-Design ", "2020")
            .render(&mut backend)
            .unwrap();
        let frame = backend.target_mut();
        assert!(frame.lit_in(70, 24, 80, 44) > 0);

        Screen::reading(&layout, "1.00C", true, "YR-Design ", "2020")
            .render(&mut backend)
            .unwrap();
        // the longer text's tail is gone
        assert_eq!(backend.target_mut().lit_in(58, 24, 80, 44), 0);
    }

    #[test]
    fn test_fill_rect_off_panel() {
        let mut backend = GraphicsBackend::new(Frame::new());
        assert_eq!(
            backend.fill_rect(200, 0, 4, 4, Color::White),
            Err(DisplayError::InvalidCoordinates)
        );
    }
}
