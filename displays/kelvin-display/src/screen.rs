//! Retained screen model
//!
//! A screen is a short list of text items. The meter builds one per cycle
//! and the display task renders it; rendering always starts by clearing
//! the full panel.

use heapless::{String, Vec};

use crate::backend::{Color, DisplayBackend, DisplayError, TextSize};
use crate::layout::{Layout, Position};

/// Maximum text items per screen
pub const MAX_ITEMS: usize = 4;

/// Maximum characters per text item
pub const TEXT_LEN: usize = 24;

/// Where a text item starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Anchor {
    At(Position),
    /// Same line, right after the previous item
    AfterPrevious,
}

/// One piece of text on a screen
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextItem {
    pub anchor: Anchor,
    pub size: TextSize,
    pub color: Color,
    /// Drop to small text when large text would run off the panel
    pub shrink_to_fit: bool,
    pub text: String<TEXT_LEN>,
}

/// Screen content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Screen {
    items: Vec<TextItem, MAX_ITEMS>,
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

fn truncated(text: &str) -> String<TEXT_LEN> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            dirty: true,
        }
    }

    /// Append a text item; items beyond [`MAX_ITEMS`] are dropped
    pub fn push(&mut self, anchor: Anchor, size: TextSize, color: Color, text: &str) {
        let item = TextItem {
            anchor,
            size,
            color,
            shrink_to_fit: false,
            text: truncated(text),
        };
        let _ = self.items.push(item);
        self.dirty = true;
    }

    fn push_footer(&mut self, at: Position, banner: &str, accent: &str) {
        self.push(Anchor::At(at), TextSize::Small, Color::White, banner);
        self.push(Anchor::AfterPrevious, TextSize::Small, Color::Orange, accent);
    }

    /// Start-up screen: title and footer
    pub fn splash(layout: &Layout, title: &str, banner: &str, accent: &str) -> Self {
        let mut screen = Self::new();
        screen.push(Anchor::At(layout.title), TextSize::Large, Color::White, title);
        if let Some(item) = screen.items.last_mut() {
            item.shrink_to_fit = true;
        }
        screen.push_footer(layout.splash_footer, banner, accent);
        screen
    }

    /// Reading screen: a value or a no-data message, and the footer
    pub fn reading(
        layout: &Layout,
        text: &str,
        is_value: bool,
        banner: &str,
        accent: &str,
    ) -> Self {
        let at = if is_value { layout.value } else { layout.message };
        let mut screen = Self::new();
        screen.push(Anchor::At(at), TextSize::Large, Color::White, text);
        screen.push_footer(layout.footer, banner, accent);
        screen
    }

    pub fn items(&self) -> &[TextItem] {
        &self.items
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Clear the panel, draw every item and flush
    pub fn render<B: DisplayBackend>(&self, backend: &mut B) -> Result<(), DisplayError> {
        let (width, height) = backend.dimensions();
        backend.fill_rect(0, 0, width, height, Color::Black)?;

        let mut cursor = Position::new(0, 0);
        for item in &self.items {
            let start = match item.anchor {
                Anchor::At(p) => p,
                Anchor::AfterPrevious => cursor,
            };

            let mut size = item.size;
            if item.shrink_to_fit && size == TextSize::Large {
                let glyphs = item.text.chars().count() as u16;
                let end = start.x.saturating_add(glyphs.saturating_mul(backend.char_width(size)));
                if end > width {
                    size = TextSize::Small;
                }
            }

            let end_x = backend.draw_text(start.x, start.y, size, item.color, &item.text)?;
            cursor = Position::new(end_x, start.y);
        }

        backend.flush()
    }
}
