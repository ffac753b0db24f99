//! Runtime, validated panel configuration.

use crate::error::{Error, Result};

use super::HardwareMapping;

/// Row-scan strategy. See SPEC_FULL.md §9 for why `Interlaced` is the
/// recommended default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Progressive,
    Interlaced,
}

/// Validated, immutable-after-construction panel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareConfig {
    pub rows: usize,
    pub cols: usize,
    pub pwm_bits: u8,
    pub brightness: u8,
    pub scan_mode: ScanMode,
    pub mapping: HardwareMapping,
}

/// The frame buffer packs `pwm_bits * cols * (rows / 2)` bytes per plane
/// set; this bounds runaway configurations (e.g. accidentally chaining
/// hundreds of panels) without imposing an arbitrary panel-size limit.
const MAX_BUFFER_BYTES: usize = 16 * 1024 * 1024;

impl HardwareConfig {
    pub fn new(
        rows: usize,
        cols: usize,
        pwm_bits: u8,
        brightness: u8,
        scan_mode: ScanMode,
        mapping: HardwareMapping,
    ) -> Result<Self> {
        if !(1..=11).contains(&pwm_bits) {
            return Err(Error::InvalidConfig(format!(
                "pwm_bits must be in 1..=11, got {pwm_bits}"
            )));
        }
        if !(1..=100).contains(&brightness) {
            return Err(Error::InvalidConfig(format!(
                "brightness must be in 1..=100, got {brightness}"
            )));
        }
        if rows % 2 != 0 {
            return Err(Error::InvalidConfig(format!("rows must be even, got {rows}")));
        }
        let buffer_bytes = pwm_bits as usize * cols * (rows / 2);
        if buffer_bytes > MAX_BUFFER_BYTES {
            return Err(Error::InvalidConfig(format!(
                "rows*cols ({rows}x{cols}) at pwm_bits={pwm_bits} needs {buffer_bytes} bytes \
                 per buffer, exceeding the {MAX_BUFFER_BYTES} cap"
            )));
        }
        Ok(Self { rows, cols, pwm_bits, brightness, scan_mode, mapping })
    }

    pub fn d_rows(&self) -> usize {
        self.rows / 2
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            rows: 64,
            cols: 64,
            pwm_bits: 11,
            brightness: 100,
            scan_mode: ScanMode::Interlaced,
            mapping: HardwareMapping::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_pwm_bits() {
        let mapping = HardwareMapping::default();
        assert!(HardwareConfig::new(64, 64, 0, 100, ScanMode::Interlaced, mapping).is_err());
        assert!(HardwareConfig::new(64, 64, 12, 100, ScanMode::Interlaced, mapping).is_err());
        assert!(HardwareConfig::new(64, 64, 11, 100, ScanMode::Interlaced, mapping).is_ok());
    }

    #[test]
    fn rejects_out_of_range_brightness() {
        let mapping = HardwareMapping::default();
        assert!(HardwareConfig::new(64, 64, 11, 0, ScanMode::Interlaced, mapping).is_err());
        assert!(HardwareConfig::new(64, 64, 11, 101, ScanMode::Interlaced, mapping).is_err());
    }

    #[test]
    fn rejects_odd_rows() {
        let mapping = HardwareMapping::default();
        assert!(HardwareConfig::new(33, 64, 11, 100, ScanMode::Interlaced, mapping).is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let hc = HardwareConfig::default();
        assert_eq!(hc.d_rows(), 32);
    }
}
