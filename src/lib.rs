//! Bit-banged HUB75 RGB LED matrix driver for the Rockchip RK3288
//! (Asus Tinker Board).
//!
//! The core is [`matrix::Matrix`]: open a [`hardware::HardwareConfig`],
//! construct it, write pixels, call `render()`. Everything else
//! ([`toolkit`], [`emulator`]) is a consumer of that surface.

pub mod cie;
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod gpio;
pub mod hardware;
pub mod matrix;
pub mod pin;
pub mod regs;
pub mod refresh;
pub mod toolkit;

pub use error::{Error, Result};
pub use hardware::{HardwareConfig, HardwareMapping, ScanMode};
pub use matrix::Matrix;
