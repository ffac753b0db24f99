//! Play a local GIF file on the panel.

use std::fs::File;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use argh::FromArgs;

use ledmatrix::emulator::Emulator;
use ledmatrix::toolkit::{Canvas, ToolKit};
use ledmatrix::{HardwareConfig, Matrix};

#[derive(FromArgs)]
/// Play a GIF file on the panel.
struct Args {
    /// path to the GIF file
    #[argh(option, default = "String::from(\"gopher-dance-long-3x.gif\")")]
    gif: String,

    /// drive a desktop window instead of real hardware
    #[argh(switch)]
    emulator: bool,

    /// panel/window width
    #[argh(option, default = "64")]
    cols: usize,

    /// panel/window height
    #[argh(option, default = "64")]
    rows: usize,
}

fn open_sink(emulator: bool, cols: usize, rows: usize) -> anyhow::Result<Box<dyn Canvas>> {
    if emulator {
        Ok(Box::new(Emulator::new(cols, rows)?))
    } else {
        let config = HardwareConfig { rows, cols, ..HardwareConfig::default() };
        Ok(Box::new(Matrix::new(config).context("failed to open the matrix")?))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let file = File::open(&args.gif).with_context(|| format!("opening {}", args.gif))?;
    let mut sink = open_sink(args.emulator, args.cols, args.rows)?;

    let cancel = AtomicBool::new(false);
    let mut tk = ToolKit::new(sink.as_mut());
    tk.play_gif(file, &cancel).with_context(|| format!("playing {}", args.gif))?;
    Ok(())
}
