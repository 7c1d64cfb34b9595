//! RTD converter drivers

pub mod max31865;

pub use max31865::Max31865;
