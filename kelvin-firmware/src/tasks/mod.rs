//! Embassy async tasks
//!
//! Exactly one meter task runs, chosen by the configured sensor. The
//! display and LED tasks run alongside it.

pub mod display;
pub mod ir;
pub mod led;
pub mod meter;
pub mod rtd;
pub mod rtd_diagnostic;

use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{Blocking, UartTx};

pub use display::display_task;
pub use ir::ir_task;
pub use led::led_task;
pub use rtd::rtd_task;
pub use rtd_diagnostic::rtd_diagnostic_task;

/// Serial console port, transmit only
pub type ConsolePort = UartTx<'static, UART0, Blocking>;
