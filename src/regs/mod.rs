//! Register Mapper: owns the `/dev/mem` file descriptor and the mmapped
//! physical-memory windows for the GPIO banks, GRF, PMU, CRU and PWM
//! blocks.
//!
//! Every mapping is exposed as a word-addressable [`RegisterRegion`].
//! Writes are plain (non-atomic) volatile stores; ordering is simply the
//! program order of writes issued by the refresh thread, which is the only
//! thread allowed to touch this memory after [`RegisterMapper::open`]
//! returns (see the concurrency model in SPEC_FULL.md §5).

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;

use memmap2::{MmapMut, MmapOptions};

use crate::error::{Error, Result};
use crate::pin::NUM_BANKS;

pub const BLOCK_SIZE: usize = 4096;
const WORDS_PER_BLOCK: usize = BLOCK_SIZE / 4;

const GPIO_BASE_ADDR: u64 = 0xFF75_0000;
const GPIO_LEN: u64 = 0x0001_0000;
const GPIO_CH_OFFSET: u64 = 0x0002_0000;

const GRF_PHYS: u64 = 0xFF77_0000;
const PWM_PHYS: u64 = 0xFF68_0000;
const PMU_PHYS: u64 = 0xFF73_0000;
const CRU_PHYS: u64 = 0xFF76_0000;

const DEV_MEM: &str = "/dev/mem";

/// A single mmapped physical-memory window, addressed in 32-bit words.
pub struct RegisterRegion {
    map: MmapMut,
    name: &'static str,
}

impl RegisterRegion {
    fn map(file: &File, phys: u64, name: &'static str) -> Result<Self> {
        // SAFETY: `/dev/mem` is opened O_SYNC and the offset/len describe a
        // device register window; mapping device memory this way is
        // inherently unsafe but is exactly what this crate exists to do.
        let map = unsafe {
            MmapOptions::new()
                .offset(phys)
                .len(BLOCK_SIZE)
                .map_mut(file)
                .map_err(|source| Error::Mmap { region: name, phys, source })?
        };
        log::info!("mapped {name} at physical {phys:#010x} ({BLOCK_SIZE} bytes)");
        Ok(Self { map, name })
    }

    #[inline]
    fn ptr(&self, word: usize) -> *mut u32 {
        debug_assert!(word < WORDS_PER_BLOCK, "{}: word {word} out of range", self.name);
        self.map.as_ptr().cast::<u32>().wrapping_add(word).cast_mut()
    }

    /// Read word `word` (4-byte granularity, i.e. `word = byte_offset / 4`).
    #[inline]
    pub fn read(&self, word: usize) -> u32 {
        unsafe { std::ptr::read_volatile(self.ptr(word)) }
    }

    /// Write word `word`.
    #[inline]
    pub fn write(&self, word: usize, value: u32) {
        unsafe { std::ptr::write_volatile(self.ptr(word), value) }
    }

    /// Read-modify-write `word` so that `value & mask` bits become `1` and
    /// all other bits in `mask` become `0`; bits outside `mask` are left
    /// untouched.
    #[inline]
    pub fn write_masked(&self, word: usize, value: u32, mask: u32) {
        let old = self.read(word);
        self.write(word, (old & !(!value & mask)) | (value & mask));
    }
}

/// Owns every mapped physical-memory window the core touches.
pub struct RegisterMapper {
    pub gpio: Vec<RegisterRegion>,
    pub grf: RegisterRegion,
    pub pmu: RegisterRegion,
    pub cru: RegisterRegion,
    #[allow(dead_code)] // mapped for parity with the original board driver; unused by the core
    pub pwm: RegisterRegion,
}

impl RegisterMapper {
    /// Open `/dev/mem` and map every region this driver needs. On any
    /// failure, every region mapped so far is dropped (and thus unmapped)
    /// before the error is returned.
    pub fn open() -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(DEV_MEM)
            .map_err(|source| Error::DeviceOpen { path: DEV_MEM, source })?;

        let mut gpio = Vec::with_capacity(NUM_BANKS);
        for bank in 0..NUM_BANKS {
            let mut phys = GPIO_BASE_ADDR + bank as u64 * GPIO_LEN;
            if bank > 0 {
                phys += GPIO_CH_OFFSET;
            }
            gpio.push(RegisterRegion::map(&file, phys, "gpio bank")?);
        }

        let grf = RegisterRegion::map(&file, GRF_PHYS, "grf")?;
        let pmu = RegisterRegion::map(&file, PMU_PHYS, "pmu")?;
        let cru = RegisterRegion::map(&file, CRU_PHYS, "cru")?;
        let pwm = RegisterRegion::map(&file, PWM_PHYS, "pwm")?;

        Ok(Self { gpio, grf, pmu, cru, pwm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_write_preserves_untouched_bits() {
        // Exercise the formula directly; RegisterRegion::write_masked can't
        // be unit tested without real device memory, but the formula it
        // implements is pure and testable.
        fn masked_write(old: u32, value: u32, mask: u32) -> u32 {
            (old & !(!value & mask)) | (value & mask)
        }

        let cases: &[(u32, u32, u32)] = &[
            (0x0000_0000, 0xFFFF_FFFF, 0x0000_00FF),
            (0xFFFF_FFFF, 0x0000_0000, 0x0F0F_0F0F),
            (0xABCD_1234, 0x1234_ABCD, 0x0000_FFFF),
            (0x0000_0000, 0x0000_0000, 0x0000_0000),
        ];
        for &(old, value, mask) in cases {
            let new = masked_write(old, value, mask);
            assert_eq!(new & !mask, old & !mask, "untouched bits changed");
            assert_eq!(new & mask, value & mask, "masked bits not set correctly");
        }
    }
}
