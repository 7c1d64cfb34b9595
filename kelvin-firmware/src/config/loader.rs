//! Embedded configuration loader
//!
//! Falls back to the sensor defaults if the embedded file cannot be parsed
//! or fails validation.

use defmt::*;

use kelvin_core::config::{parse_config, LayoutKind, MeterConfig, SensorKind};
use kelvin_display::Layout;

/// Embedded configuration (compiled into firmware)
/// Edit meter.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../meter.toml");

/// Parse and validate the embedded configuration
pub fn load_config() -> MeterConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            // build.rs checks the same file, so this is a parser mismatch
            error!("Failed to parse embedded config: {:?}", e);
            return fallback(SensorKind::default());
        }
    };

    if let Err(e) = config.validate() {
        warn!("Embedded config rejected: {:?}", e);
        return fallback(config.sensor);
    }

    log_config_summary(&config);
    config
}

fn fallback(sensor: SensorKind) -> MeterConfig {
    warn!("Using {:?} defaults", sensor);
    let config = MeterConfig::for_sensor(sensor);
    log_config_summary(&config);
    config
}

/// Panel layout for a configured layout kind
pub fn layout(kind: LayoutKind) -> Layout {
    match kind {
        LayoutKind::Oled128x64 => Layout::OLED_128X64,
        LayoutKind::M5StickC => Layout::M5STICKC,
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &MeterConfig) {
    info!(
        "Meter: {:?}, every {} ms",
        config.sensor,
        config.interval_ms()
    );
    match config.sensor {
        SensorKind::Rtd | SensorKind::RtdDiagnostic => {
            debug!(
                "  {:?} probe, Rref {} ohms, {:?} wire, {:?} filter, DRDY {}",
                config.rtd.kind,
                config.rtd.rref_ohms,
                config.rtd.wiring,
                config.rtd.filter,
                config.rtd.data_ready
            );
        }
        SensorKind::Infrared => {
            debug!(
                "  MLX90614 at {:#x}, {:?}, PEC check {}",
                config.ir.address, config.ir.channel, config.ir.verify_pec
            );
        }
    }
    debug!("  Display {:?}, serial {} baud", config.display.layout, config.serial.baud);
}
