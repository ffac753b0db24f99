//! Static record of which logical pin carries each HUB75 signal.

use crate::pin::LogicalPin;

use super::rk3288_pins as p;

/// The 14 logical pins a HUB75 panel chain needs, immutable after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareMapping {
    pub output_enable: LogicalPin,
    pub clock: LogicalPin,
    pub strobe: LogicalPin,

    pub a: LogicalPin,
    pub b: LogicalPin,
    pub c: LogicalPin,
    pub d: LogicalPin,
    pub e: LogicalPin,

    pub r1: LogicalPin,
    pub g1: LogicalPin,
    pub b1: LogicalPin,
    pub r2: LogicalPin,
    pub g2: LogicalPin,
    pub b2: LogicalPin,
}

impl HardwareMapping {
    /// All 14 pins, in the fixed definition order used to build the
    /// `BankWriter`s over colour/clock and address lines.
    pub fn pins(&self) -> [LogicalPin; 14] {
        [
            self.output_enable,
            self.clock,
            self.strobe,
            self.a,
            self.b,
            self.c,
            self.d,
            self.e,
            self.r1,
            self.g1,
            self.b1,
            self.r2,
            self.g2,
            self.b2,
        ]
    }

    /// Pins driven by `data_writer`: colour lines plus clock, in the order
    /// their bits are packed into one [`crate::framebuffer`] byte.
    pub fn data_pins(&self) -> [LogicalPin; 7] {
        [self.r1, self.g1, self.b1, self.r2, self.g2, self.b2, self.clock]
    }

    /// Pins driven by the per-row address `BankWriter`s.
    pub fn addr_pins(&self) -> [LogicalPin; 5] {
        [self.a, self.b, self.c, self.d, self.e]
    }
}

impl Default for HardwareMapping {
    fn default() -> Self {
        Self {
            output_enable: p::GPIO0_C1,
            clock: p::GPIO5_B4,
            strobe: p::GPIO6_A4,

            a: p::GPIO5_B7,
            b: p::GPIO7_B0,
            c: p::GPIO5_B6,
            d: p::GPIO6_A3,
            e: p::GPIO5_B3,

            r1: p::GPIO5_B5,
            g1: p::GPIO5_C0,
            b1: p::GPIO7_C6,

            r2: p::GPIO7_C7,
            g2: p::GPIO5_B2,
            b2: p::GPIO7_A7,
        }
    }
}
