//! Display backend trait
//!
//! Defines the interface for pixel displays. Coordinates are pixels with
//! the origin at the top-left corner; text is positioned by the top-left
//! corner of its first glyph.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Buffer overflow
    BufferOverflow,
}

/// Drawing colours
///
/// Monochrome panels render every colour except black as lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    #[default]
    Black,
    White,
    /// Highlight colour for the footer accent
    Orange,
}

impl Color {
    pub const fn is_lit(self) -> bool {
        !matches!(self, Color::Black)
    }
}

/// Text scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// Footer and long titles
    #[default]
    Small,
    /// Readings and short titles
    Large,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for rendering to displays.
pub trait DisplayBackend {
    /// Fill the whole display with one colour
    fn clear(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: Color,
    ) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (`x`, `y`)
    ///
    /// Returns the x coordinate just past the last glyph, where a
    /// following text continues.
    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        size: TextSize,
        color: Color,
        text: &str,
    ) -> Result<u16, DisplayError>;

    /// Width in pixels of one glyph at `size`
    fn char_width(&self, size: TextSize) -> u16;

    /// Flush buffered content to the display
    ///
    /// For displays with internal buffers, this sends the buffer to the hardware.
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Display size in pixels (width, height)
    fn dimensions(&self) -> (u16, u16);
}
