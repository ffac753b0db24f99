//! Bit-plane dwell timing.
//!
//! BCM weights planes `2^0 .. 2^10`; the time the panel stays lit for each
//! plane must track those weights. The monotonic clock's resolution is
//! coarse enough (~1 us on the reference board) that the low planes, which
//! need dwells as short as ~50 ns, cannot be timed by sleeping — only a
//! tight busy-wait keeps that precision. The highest plane dwells for tens
//! of microseconds, long enough that a scheduler sleep is worth the
//! CPU it gives back.

use std::time::{Duration, Instant};

pub const NUM_PLANES: usize = 11;

/// Values measured on an Asus Tinker Board (RK3288) at a particular build
/// and load. Not portable to other SoCs or kernels — see [`DwellTable::calibrate`].
const REFERENCE_TABLE_NS: [u64; NUM_PLANES] =
    [53, 120, 250, 510, 1000, 2100, 4800, 10000, 30000, 60000, 37000];

/// Iteration count for the calibration busy loop. Large enough that
/// `Instant` resolution doesn't dominate the measurement.
const CALIBRATION_ITERS: u64 = 2_000_000;

pub struct DwellTable {
    ns: [u64; NUM_PLANES],
}

impl DwellTable {
    /// The hardcoded reference table, unscaled.
    pub fn hardcoded() -> Self {
        Self { ns: REFERENCE_TABLE_NS }
    }

    /// Time the cost of one iteration of the busy-wait primitive on this
    /// host and scale the reference table by the ratio against the
    /// reference board's measured per-iteration cost. Ports to other SoCs
    /// should call this rather than trust `REFERENCE_TABLE_NS` directly.
    pub fn calibrate() -> Self {
        // Per-iteration cost measured on the reference board when
        // REFERENCE_TABLE_NS was captured.
        const REFERENCE_NS_PER_ITER: f64 = 1.8;

        let start = Instant::now();
        let mut sink: u64 = 0;
        for i in 0..CALIBRATION_ITERS {
            sink = sink.wrapping_add(std::hint::black_box(i));
        }
        std::hint::black_box(sink);
        let elapsed = start.elapsed();

        let ns_per_iter = elapsed.as_nanos() as f64 / CALIBRATION_ITERS as f64;
        let scale = ns_per_iter / REFERENCE_NS_PER_ITER;

        let mut ns = REFERENCE_TABLE_NS;
        for (i, value) in ns.iter_mut().enumerate() {
            // The highest plane is sleep-driven rather than busy-waited, so
            // its dwell tracks wall-clock time directly and isn't rescaled
            // by the busy-loop's relative speed.
            if i != NUM_PLANES - 1 {
                *value = (*value as f64 / scale).round().max(1.0) as u64;
            }
        }
        log::debug!("calibrated dwell table: {ns:?} (scale={scale:.3})");
        Self { ns }
    }

    /// Hold the panel lit for `plane`'s dwell. All planes but the last
    /// busy-wait; the last sleeps.
    pub fn dwell(&self, plane: usize) {
        let ns = self.ns[plane];
        if plane == NUM_PLANES - 1 {
            std::thread::sleep(Duration::from_nanos(ns));
        } else {
            busy_wait_ns(ns);
        }
    }
}

fn busy_wait_ns(ns: u64) {
    let target = Duration::from_nanos(ns);
    let start = Instant::now();
    while start.elapsed() < target {
        std::hint::spin_loop();
    }
}

/// The table a freshly constructed `Matrix` uses: calibrated at startup
/// unless built with the `precalibrated` feature, in which case the
/// reference board's table is trusted as-is.
pub fn startup_table() -> DwellTable {
    if cfg!(feature = "precalibrated") {
        DwellTable::hardcoded()
    } else {
        DwellTable::calibrate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hardcoded_table_matches_reference_values() {
        let table = DwellTable::hardcoded();
        assert_eq!(table.ns, REFERENCE_TABLE_NS);
    }

    #[test]
    fn highest_plane_dwell_is_the_documented_outlier() {
        let table = DwellTable::hardcoded();
        // The series breaks at the last plane; see SPEC_FULL.md design notes.
        assert!(table.ns[NUM_PLANES - 1] < table.ns[NUM_PLANES - 2]);
    }
}
