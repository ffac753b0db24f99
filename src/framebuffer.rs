//! Packed BCM pixel storage.
//!
//! A `Matrix` owns two of these: one held by the caller ("back", open for
//! pixel writes) and one held by the refresh thread ("front", scanned out
//! to the panel). [`crate::matrix::Matrix::render`] exchanges them whole
//! through a channel rather than locking a shared buffer; see
//! `src/matrix.rs` for the handoff.

use crate::cie::CieTable;

/// Buffers are always allocated at the maximum bit-plane depth so that
/// [`FrameBuffer::set_pwm_bits`] can shrink or grow the active plane count
/// at runtime without a reallocation.
const MAX_PWM_BITS: usize = 11;

#[derive(Clone)]
pub struct FrameBuffer {
    data: Vec<u8>,
    cols: usize,
    d_rows: usize,
    pwm_bits: usize,
}

impl FrameBuffer {
    pub fn new(cols: usize, d_rows: usize, pwm_bits: u8) -> Self {
        let len = MAX_PWM_BITS * cols * d_rows;
        Self { data: vec![0u8; len], cols, d_rows, pwm_bits: pwm_bits as usize }
    }

    pub fn pwm_bits(&self) -> usize {
        self.pwm_bits
    }

    /// Change the active plane count. The backing storage is untouched;
    /// only the row stride used by `set_pixel` and the refresh loop
    /// changes, so this never resizes the allocation.
    pub fn set_pwm_bits(&mut self, pwm_bits: u8) {
        self.pwm_bits = pwm_bits as usize;
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn d_rows(&self) -> usize {
        self.d_rows
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite this buffer's contents with `other`'s, reusing this
    /// buffer's own allocation. `other` must share the same `cols`/`d_rows`
    /// (true for any two buffers a single `Matrix` constructs).
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        self.data.copy_from_slice(&other.data);
        self.pwm_bits = other.pwm_bits;
    }

    /// Write one pixel. `y` is a full-panel row index in `[0, rows)`; rows
    /// `< d_rows` are the upper half (R1/G1/B1 lanes), the rest the lower
    /// half (R2/G2/B2 lanes).
    pub fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8, cie: &CieTable) {
        let lower = y >= self.d_rows;
        let y_prime = if lower { y - self.d_rows } else { y };

        // R/G/B lane bits for this half, and the mask that preserves the
        // other half's 3-bit group untouched.
        let (r_lane, g_lane, b_lane, other_mask): (u8, u8, u8, u8) = if lower {
            (0x08, 0x10, 0x20, 0x07)
        } else {
            (0x01, 0x02, 0x04, 0x38)
        };

        let cr = cie.get(r);
        let cg = cie.get(g);
        let cb = cie.get(b);

        let row_stride = self.cols * self.pwm_bits;
        let row_base = y_prime * row_stride;
        for p in 0..self.pwm_bits {
            let idx = row_base + x + p * self.cols;
            let mut byte = self.data[idx] & other_mask;
            if (cr >> p) & 1 != 0 {
                byte |= r_lane;
            }
            if (cg >> p) & 1 != 0 {
                byte |= g_lane;
            }
            if (cb >> p) & 1 != 0 {
                byte |= b_lane;
            }
            self.data[idx] = byte;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_from_reproduces_the_source_content() {
        let cie = CieTable::build(100, 5);
        let mut src = FrameBuffer::new(16, 8, 5);
        src.set_pixel(2, 3, 200, 100, 50, &cie);

        let mut dst = FrameBuffer::new(16, 8, 5);
        dst.set_pixel(9, 1, 10, 20, 30, &cie);
        dst.copy_from(&src);

        assert_eq!(dst.data(), src.data());
        assert_eq!(dst.pwm_bits(), src.pwm_bits());
    }

    #[test]
    fn pixel_write_touches_only_its_own_bytes_and_lane() {
        let mut fb = FrameBuffer::new(64, 32, 11);
        let cie = CieTable::build(100, 11);
        fb.set_pixel(3, 5, 255, 0, 0, &cie);

        let pwm_bits = fb.pwm_bits();
        let expected: Vec<usize> =
            (0..pwm_bits).map(|p| 3 + 5 * 64 * pwm_bits + p * 64).collect();

        for (idx, &byte) in fb.data.iter().enumerate() {
            if expected.contains(&idx) {
                assert_eq!(byte & 0x38, 0, "byte {idx} touched the other half's lanes");
            } else {
                assert_eq!(byte, 0, "byte {idx} unexpectedly non-zero");
            }
        }
    }

    #[test]
    fn upper_and_lower_half_writes_do_not_interfere() {
        let mut fb = FrameBuffer::new(8, 4, 3);
        let cie = CieTable::build(100, 3);
        // Same (x, row-within-half) on both halves of an 8-row panel
        // (d_rows = 4): upper half row 1, lower half row 1+4=5.
        fb.set_pixel(2, 1, 255, 255, 255, &cie);
        fb.set_pixel(2, 5, 255, 255, 255, &cie);

        // Both calls land on y_prime = 1, p = 0 -> the same byte.
        let idx = 1 * (8 * 3) + 2;
        assert_eq!(fb.data[idx] & 0x07, 0x07);
        assert_eq!(fb.data[idx] & 0x38, 0x38);
    }
}
