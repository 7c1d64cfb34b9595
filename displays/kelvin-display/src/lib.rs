//! Display abstraction and screen model for Kelvin meters
//!
//! This crate provides:
//! - `DisplayBackend` trait for pixel displays (clear, fill, text, flush)
//! - Fixed `Layout`s for the supported panels
//! - `Screen`, a retained list of text items built for the splash and
//!   reading views and rendered onto any backend
//! - `GraphicsBackend`, a backend over any monochrome `embedded-graphics`
//!   draw target
//!
//! # Architecture
//!
//! The meter task builds a `Screen` each cycle and hands it to the display
//! task, which renders it onto the panel backend and flushes the panel.
//! Every render clears the whole panel first, so nothing from the previous
//! reading survives.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod graphics;
pub mod layout;
pub mod screen;

// Re-export key types
pub use backend::{Color, DisplayBackend, DisplayError, TextSize};
pub use graphics::GraphicsBackend;
pub use layout::{Layout, Position};
pub use screen::{Screen, TextItem};
