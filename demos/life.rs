//! Conway's Game of Life on the panel. `--emulator` drives a desktop
//! window instead of real GPIO.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Context;
use argh::FromArgs;
use image::{Rgba, RgbaImage};
use rand::Rng;

use ledmatrix::emulator::Emulator;
use ledmatrix::toolkit::{Animation, Canvas, ToolKit};
use ledmatrix::{HardwareConfig, Matrix};

#[derive(FromArgs)]
/// Conway's Game of Life.
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

/// A width x height grid of RGBA cells, wrapped toroidally.
struct Field {
    cells: Vec<Rgba<u8>>,
    w: usize,
    h: usize,
}

impl Field {
    fn new(w: usize, h: usize) -> Self {
        Self { cells: vec![Rgba([0, 0, 0, 255]); w * h], w, h }
    }

    fn get(&self, x: i64, y: i64) -> Rgba<u8> {
        let x = x.rem_euclid(self.w as i64) as usize;
        let y = y.rem_euclid(self.h as i64) as usize;
        self.cells[y * self.w + x]
    }

    fn set(&mut self, x: usize, y: usize, c: Rgba<u8>) {
        self.cells[y * self.w + x] = c;
    }

    fn next_cell(&self, x: usize, y: usize) -> Rgba<u8> {
        let mut alive = 0u32;
        let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
        for i in -1i64..=1 {
            for j in -1i64..=1 {
                if i == 0 && j == 0 {
                    continue;
                }
                let c = self.get(x as i64 + i, y as i64 + j);
                if c != Rgba([0, 0, 0, 255]) {
                    alive += 1;
                    r += c[0] as u32;
                    g += c[1] as u32;
                    b += c[2] as u32;
                }
            }
        }
        if alive == 3 {
            Rgba([
                (r as f64 * 0.3336666667).min(255.0) as u8,
                (g as f64 * 0.3336666667).min(255.0) as u8,
                (b as f64 * 0.3336666667).min(255.0) as u8,
                255,
            ])
        } else if alive == 2 {
            self.get(x as i64, y as i64)
        } else {
            Rgba([0, 0, 0, 255])
        }
    }
}

struct Life {
    a: Field,
    b: Field,
    w: usize,
    h: usize,
}

impl Life {
    fn new(w: usize, h: usize) -> Self {
        let mut a = Field::new(w, h);
        let mut rng = rand::thread_rng();
        let colors = [
            Rgba([231, 76, 60, 255]),
            Rgba([46, 204, 113, 255]),
            Rgba([52, 152, 219, 255]),
        ];
        let nb_cells = w * h / 4;
        for i in 0..nb_cells {
            let c = colors[i / (nb_cells / 3).max(1) % colors.len()];
            a.set(rng.gen_range(0..w), rng.gen_range(0..h), c);
        }
        Self { a, b: Field::new(w, h), w, h }
    }

    fn step(&mut self) {
        for y in 0..self.h {
            for x in 0..self.w {
                let next = self.a.next_cell(x, y);
                self.b.set(x, y, next);
            }
        }
        std::mem::swap(&mut self.a, &mut self.b);
    }
}

struct LifeAnimation {
    life: Life,
    img: RgbaImage,
}

impl LifeAnimation {
    fn new(w: usize, h: usize) -> Self {
        Self { life: Life::new(w, h), img: RgbaImage::new(w as u32, h as u32) }
    }

    fn sync_image(&mut self) {
        for y in 0..self.life.h {
            for x in 0..self.life.w {
                self.img.put_pixel(x as u32, y as u32, self.life.a.get(x as i64, y as i64));
            }
        }
    }
}

impl Animation for LifeAnimation {
    fn delay(&self) -> Duration {
        Duration::from_millis(100)
    }

    fn image(&self) -> &RgbaImage {
        &self.img
    }

    fn next(&mut self) -> std::io::Result<()> {
        self.life.step();
        self.sync_image();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut sink = open_sink(args.emulator, args.cols, args.rows)?;
    let mut anim = LifeAnimation::new(sink.width(), sink.height());
    anim.sync_image();

    let cancel = AtomicBool::new(false);
    let mut tk = ToolKit::new(sink.as_mut());
    tk.play_animation(&mut anim, &cancel)?;
    Ok(())
}
