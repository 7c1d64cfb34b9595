//! Infrared thermometer drivers

pub mod mlx90614;

pub use mlx90614::Mlx90614;
