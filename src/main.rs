//! `matrixctl`: fill the panel with a solid colour for a fixed duration,
//! useful for bring-up and for sanity-checking a new `HardwareMapping`.

use std::time::Duration;

use anyhow::{bail, Context};
use argh::FromArgs;

use ledmatrix::{HardwareConfig, HardwareMapping, Matrix, ScanMode};

#[derive(FromArgs)]
/// Drive a HUB75 panel attached to the RK3288 GPIO header.
struct Args {
    /// panel rows
    #[argh(option, default = "64")]
    rows: usize,

    /// panel columns
    #[argh(option, default = "64")]
    cols: usize,

    /// bit-planes of colour depth, 1..=11
    #[argh(option, default = "11")]
    pwm_bits: u8,

    /// brightness percent, 1..=100
    #[argh(option, default = "100")]
    brightness: u8,

    /// scan mode: "progressive" or "interlaced"
    #[argh(option, default = "String::from(\"interlaced\")")]
    scan_mode: String,

    /// fill colour as "r,g,b"
    #[argh(option, default = "String::from(\"255,255,255\")")]
    color: String,

    /// how long to hold the fill before exiting, in seconds
    #[argh(option, default = "5")]
    duration_secs: u64,
}

fn parse_scan_mode(s: &str) -> anyhow::Result<ScanMode> {
    match s {
        "progressive" => Ok(ScanMode::Progressive),
        "interlaced" => Ok(ScanMode::Interlaced),
        other => bail!("unknown scan mode {other:?}, expected \"progressive\" or \"interlaced\""),
    }
}

fn parse_color(s: &str) -> anyhow::Result<(u8, u8, u8)> {
    let parts: Vec<&str> = s.split(',').collect();
    let [r, g, b] = parts[..] else {
        bail!("color must be \"r,g,b\", got {s:?}");
    };
    Ok((r.trim().parse()?, g.trim().parse()?, b.trim().parse()?))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let scan_mode = parse_scan_mode(&args.scan_mode)?;
    let (r, g, b) = parse_color(&args.color)?;

    let config = HardwareConfig::new(
        args.rows,
        args.cols,
        args.pwm_bits,
        args.brightness,
        scan_mode,
        HardwareMapping::default(),
    )
    .context("invalid hardware configuration")?;

    let mut matrix = Matrix::new(config).context("failed to open the matrix")?;
    log::info!("filling {}x{} panel with ({r}, {g}, {b})", args.cols, args.rows);

    for y in 0..args.rows {
        for x in 0..args.cols {
            matrix.set(x, y, r, g, b);
        }
    }
    matrix.render();

    std::thread::sleep(Duration::from_secs(args.duration_secs));
    matrix.close();
    Ok(())
}
