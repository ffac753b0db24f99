//! Mandelbrot zoom, recolored each frame by shrinking the escape radius.
//! Ported from the gobrot-derived original; `interpolate_colors` keeps the
//! same cosine-interpolated 16-stop palette.

use std::f64::consts::PI;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Context;
use argh::FromArgs;
use image::{Rgba, RgbaImage};

use ledmatrix::emulator::Emulator;
use ledmatrix::toolkit::{Animation, Canvas, ToolKit};
use ledmatrix::{HardwareConfig, Matrix};

#[derive(FromArgs)]
/// Mandelbrot set zoom animation.
struct Args {
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

const PALETTE_STOPS: [[u8; 4]; 16] = [
    [0x00, 0x04, 0x0f, 0xff],
    [0x03, 0x26, 0x28, 0xff],
    [0x07, 0x3e, 0x1e, 0xff],
    [0x18, 0x55, 0x08, 0xff],
    [0x5f, 0x6e, 0x0f, 0xff],
    [0x84, 0x50, 0x19, 0xff],
    [0x9b, 0x30, 0x22, 0xff],
    [0xb4, 0x92, 0x2f, 0xff],
    [0x94, 0xca, 0x3d, 0xff],
    [0x4f, 0xd5, 0x51, 0xff],
    [0x66, 0xff, 0xb3, 0xff],
    [0x82, 0xc9, 0xe5, 0xff],
    [0x9d, 0xa3, 0xeb, 0xff],
    [0xd7, 0xb5, 0xf3, 0xff],
    [0xfd, 0xd6, 0xf6, 0xff],
    [0xff, 0xf0, 0xf2, 0xff],
];

fn cosine_interpolate(c1: f64, c2: f64, mu: f64) -> f64 {
    let mu2 = (1.0 - (mu * PI).cos()) / 2.0;
    c1 * (1.0 - mu2) + c2 * mu2
}

/// Resample the 16-stop palette into `n` colors via cosine interpolation
/// between adjacent stops.
fn interpolate_colors(n: usize) -> Vec<Rgba<u8>> {
    let stops: Vec<f64> = (0..PALETTE_STOPS.len())
        .map(|i| ((i + 1) as f64 / PALETTE_STOPS.len() as f64 * 100.0).trunc() / 100.0)
        .collect();
    let mut stops = stops;
    stops[0] = 0.0;

    let channel = |c: &[u8; 4], k: usize| c[k] as f64;
    let mut out = Vec::with_capacity(n);
    let factor = 1.0 / n as f64;
    let mut i = 0.0;
    while i <= 1.0 {
        for j in 0..PALETTE_STOPS.len() - 1 {
            if i >= stops[j] && i < stops[j + 1] {
                let t = (i - stops[j]) / (stops[j + 1] - stops[j]);
                let mut px = [0u8; 4];
                for k in 0..4 {
                    let v = cosine_interpolate(
                        channel(&PALETTE_STOPS[j + 1], k),
                        channel(&PALETTE_STOPS[j], k),
                        t,
                    );
                    px[k] = v.clamp(0.0, 255.0) as u8;
                }
                out.push(Rgba(px));
            }
        }
        i += factor;
    }
    out
}

fn mandel_iteration(cx: f64, cy: f64, max_iter: u32) -> (f64, u32) {
    let (mut x, mut y) = (0.0, 0.0);
    for i in 0..max_iter {
        let xy = x * y;
        let xx = x * x;
        let yy = y * y;
        if xx + yy > 4.0 {
            return (xx + yy, i);
        }
        x = xx - yy + cx;
        y = 2.0 * xy + cy;
    }
    ((x * x + y * y) / 2.0, max_iter)
}

struct MandelbrotAnimation {
    img: RgbaImage,
    colors: Vec<Rgba<u8>>,
    max_iteration: u32,
    escape_radius: f64,
    x: f64,
    y: f64,
}

impl MandelbrotAnimation {
    fn new(w: u32, h: u32) -> Self {
        let mut a = Self {
            img: RgbaImage::new(w, h),
            colors: interpolate_colors(4000),
            max_iteration: 800,
            escape_radius: 0.02401245,
            x: -0.0091275,
            y: 0.7899912,
        };
        a.render();
        a
    }

    fn render(&mut self) {
        let (width, height) = self.img.dimensions();
        let ratio = width as f64 / height as f64;
        let xmin = self.x - self.escape_radius / 2.0;
        let xmax = (self.x + self.escape_radius / 2.0).abs();
        let ymin = self.y - self.escape_radius * ratio / 2.0;
        let ymax = (self.y + self.escape_radius * ratio / 2.0).abs();
        let xsize = xmax - xmin;
        let ysize = ymax - ymin;

        for iy in 0..height {
            for ix in 0..width {
                let x = xmin + xsize * ix as f64 / (width - 1).max(1) as f64;
                let y = ymin + ysize * iy as f64 / (height - 1).max(1) as f64;
                let (norm, it) = mandel_iteration(x, y, self.max_iteration);
                let iteration = (self.max_iteration - it) as f64 + norm.ln();
                let idx = iteration.abs() as usize;
                if idx < self.colors.len() - 1 {
                    let c1 = self.colors[idx];
                    let c2 = self.colors[idx + 1];
                    let mu = (iteration.fract()).clamp(0.0, 1.0);
                    let mut px = [0u8; 4];
                    for k in 0..4 {
                        px[k] = (c1[k] as f64 * (1.0 - mu) + c2[k] as f64 * mu) as u8;
                    }
                    self.img.put_pixel(ix, iy, Rgba(px));
                }
            }
        }
    }
}

impl Animation for MandelbrotAnimation {
    fn delay(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn image(&self) -> &RgbaImage {
        &self.img
    }

    fn next(&mut self) -> std::io::Result<()> {
        self.escape_radius -= 0.001;
        self.render();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut sink = open_sink(args.emulator, args.cols, args.rows)?;
    let mut anim = MandelbrotAnimation::new(sink.width() as u32, sink.height() as u32);

    let cancel = AtomicBool::new(false);
    let mut tk = ToolKit::new(sink.as_mut());
    tk.play_animation(&mut anim, &cancel)?;
    Ok(())
}
