//! Concrete RK3288 logical pin ids for the Tinker Board pads this driver
//! drives, carried over from the original board driver's pin table.

use crate::pin::LogicalPin;

pub const GPIO0_C1: LogicalPin = 17;

pub const GPIO5_B0: LogicalPin = 8 + 152;
pub const GPIO5_B1: LogicalPin = 9 + 152;
pub const GPIO5_B2: LogicalPin = 10 + 152;
pub const GPIO5_B3: LogicalPin = 11 + 152;
pub const GPIO5_B4: LogicalPin = 12 + 152;
pub const GPIO5_B5: LogicalPin = 13 + 152;
pub const GPIO5_B6: LogicalPin = 14 + 152;
pub const GPIO5_B7: LogicalPin = 15 + 152;
pub const GPIO5_C0: LogicalPin = 16 + 152;
pub const GPIO5_C1: LogicalPin = 17 + 152;
pub const GPIO5_C2: LogicalPin = 18 + 152;
pub const GPIO5_C3: LogicalPin = 19 + 152;

pub const GPIO6_A0: LogicalPin = 184;
pub const GPIO6_A1: LogicalPin = 1 + 184;
pub const GPIO6_A3: LogicalPin = 3 + 184;
pub const GPIO6_A4: LogicalPin = 4 + 184;

pub const GPIO7_A0: LogicalPin = 216;
pub const GPIO7_A7: LogicalPin = 7 + 216;
pub const GPIO7_B0: LogicalPin = 8 + 216;
pub const GPIO7_B1: LogicalPin = 9 + 216;
pub const GPIO7_B2: LogicalPin = 10 + 216;
pub const GPIO7_C1: LogicalPin = 17 + 216;
pub const GPIO7_C2: LogicalPin = 18 + 216;
pub const GPIO7_C6: LogicalPin = 22 + 216;
pub const GPIO7_C7: LogicalPin = 23 + 216;

pub const GPIO8_A3: LogicalPin = 3 + 248;
pub const GPIO8_A4: LogicalPin = 4 + 248;
pub const GPIO8_A5: LogicalPin = 5 + 248;
pub const GPIO8_A6: LogicalPin = 6 + 248;
pub const GPIO8_A7: LogicalPin = 7 + 248;
pub const GPIO8_B0: LogicalPin = 8 + 248;
pub const GPIO8_B1: LogicalPin = 9 + 248;
