//! Matrix Refresh Engine: the continuously-running BCM scan loop.
//!
//! Runs on its own thread, started by [`crate::matrix::Matrix::new`] and
//! stopped by [`crate::matrix::Matrix::close`]. Owns the GPIO backend and
//! every register write after construction; see SPEC_FULL.md §5 for why
//! no locks guard the register space.

pub mod dwell;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::framebuffer::FrameBuffer;
use crate::gpio::{BankWriter, GpioBackend};
use crate::hardware::{HardwareMapping, ScanMode};
use dwell::DwellTable;

/// Everything the scan loop needs that doesn't change across frames:
/// the GPIO backend, the pin assignment, the precomputed bank writers for
/// the address and data/clock lines, and the dwell table.
pub struct RefreshContext {
    gpio: GpioBackend,
    mapping: HardwareMapping,
    addr_writer: BankWriter<5>,
    data_writer: BankWriter<7>,
    blank_writer: BankWriter<7>,
    dwell: DwellTable,
    cols: usize,
    d_rows: usize,
    scan_mode: ScanMode,
}

impl RefreshContext {
    pub fn new(
        gpio: GpioBackend,
        mapping: HardwareMapping,
        cols: usize,
        d_rows: usize,
        scan_mode: ScanMode,
        dwell: DwellTable,
    ) -> Self {
        let addr_writer = BankWriter::new(mapping.addr_pins());
        let data_writer = BankWriter::new(mapping.data_pins());
        let blank_writer = BankWriter::new(mapping.data_pins());
        Self { gpio, mapping, addr_writer, data_writer, blank_writer, dwell, cols, d_rows, scan_mode }
    }
}

fn display_row(scan_mode: ScanMode, d_rows: usize, row: usize) -> usize {
    match scan_mode {
        ScanMode::Progressive => row,
        ScanMode::Interlaced => {
            let hdrows = d_rows / 2;
            if row < hdrows {
                row * 2
            } else {
                (row - hdrows) * 2 + 1
            }
        }
    }
}

/// Scan every display row of `buf` once, emitting the shift/latch/output-
/// enable sequence for each active bit-plane. `pwm_bits` selects how many
/// of the highest-order planes are scanned; see
/// [`crate::framebuffer::FrameBuffer::set_pwm_bits`].
pub fn render_frame(ctx: &RefreshContext, buf: &[u8], pwm_bits: usize) {
    let pwm_start_bit = dwell::NUM_PLANES - pwm_bits;
    let colsize = ctx.cols * pwm_bits;
    let regs = ctx.gpio.regs();

    for row in 0..ctx.d_rows {
        let drow = display_row(ctx.scan_mode, ctx.d_rows, row);
        ctx.addr_writer.write(regs, drow as u32);

        let mut i = drow * colsize;
        for plane in pwm_start_bit..dwell::NUM_PLANES {
            for _col in 0..ctx.cols {
                ctx.data_writer.write(regs, buf[i] as u32);
                ctx.gpio.digital_write(ctx.mapping.clock, true);
                i += 1;
            }
            ctx.blank_writer.write(regs, 0);
            ctx.gpio.digital_write(ctx.mapping.strobe, true);
            ctx.gpio.digital_write(ctx.mapping.strobe, false);
            ctx.gpio.digital_write(ctx.mapping.output_enable, false);
            ctx.dwell.dwell(plane);
            ctx.gpio.digital_write(ctx.mapping.output_enable, true);
        }
    }
}

/// The refresh thread body. Renders `front` continuously; each iteration
/// ends with a non-blocking check for an incoming buffer from
/// [`crate::matrix::Matrix::render`], which is swapped in immediately and
/// whose predecessor is handed back on `result_tx`.
pub fn run(
    ctx: RefreshContext,
    mut front: FrameBuffer,
    swap_rx: Receiver<FrameBuffer>,
    result_tx: Sender<FrameBuffer>,
    cancel: Arc<AtomicBool>,
) {
    let mut frames_since_report = 0u32;
    let mut last_report = Instant::now();

    while !cancel.load(Ordering::Relaxed) {
        render_frame(&ctx, front.data(), front.pwm_bits());
        frames_since_report += 1;

        let now = Instant::now();
        if now.duration_since(last_report) >= Duration::from_secs(1) {
            log::debug!("refresh rate: {frames_since_report} fps");
            frames_since_report = 0;
            last_report = now;
        }

        if let Ok(incoming) = swap_rx.try_recv() {
            let old_front = std::mem::replace(&mut front, incoming);
            if result_tx.send(old_front).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progressive_scan_is_identity() {
        for row in 0..16 {
            assert_eq!(display_row(ScanMode::Progressive, 16, row), row);
        }
    }

    #[test]
    fn interlaced_scan_matches_documented_sequence() {
        let sequence: Vec<usize> =
            (0..16).map(|row| display_row(ScanMode::Interlaced, 16, row)).collect();
        assert_eq!(sequence, vec![0, 2, 4, 6, 8, 10, 12, 14, 1, 3, 5, 7, 9, 11, 13, 15]);
    }
}
