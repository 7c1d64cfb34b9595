//! Fixed panel layouts

/// Pixel position of a text item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Where each element of the meter screens goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    /// Splash title
    pub title: Position,
    /// Footer on the splash screen
    pub splash_footer: Position,
    /// Temperature reading
    pub value: Position,
    /// No-data message, placed further left to fit
    pub message: Position,
    /// Footer on the reading screen
    pub footer: Position,
}

impl Layout {
    /// 160x80 LCD in landscape
    pub const M5STICKC: Self = Self {
        width: 160,
        height: 80,
        title: Position::new(10, 20),
        splash_footer: Position::new(70, 70),
        value: Position::new(40, 30),
        message: Position::new(5, 30),
        footer: Position::new(60, 70),
    };

    /// 128x64 OLED
    pub const OLED_128X64: Self = Self {
        width: 128,
        height: 64,
        title: Position::new(4, 8),
        splash_footer: Position::new(40, 52),
        value: Position::new(8, 24),
        message: Position::new(4, 24),
        footer: Position::new(34, 52),
    };
}

impl Default for Layout {
    fn default() -> Self {
        Self::OLED_128X64
    }
}
