//! Desktop emulator: a [`minifb`] window that stands in for real hardware
//! during development. Implements the same [`crate::toolkit::Canvas`]
//! contract as [`crate::matrix::Matrix`], so demos are agnostic to which
//! one they're driving.

use minifb::{Window, WindowOptions};

const PIXEL_PITCH_TO_GUTTER_RATIO: usize = 2;
const MARGIN: usize = 10;
const GUTTER_GRAY: u8 = 20;

pub struct Emulator {
    cols: usize,
    rows: usize,
    leds: Vec<(u8, u8, u8)>,
    window: Window,
    pixel_pitch: usize,
    gutter: usize,
    win_w: usize,
    win_h: usize,
    framebuf: Vec<u32>,
}

impl Emulator {
    pub fn new(cols: usize, rows: usize) -> anyhow::Result<Self> {
        let gutter = 3;
        let pixel_pitch = PIXEL_PITCH_TO_GUTTER_RATIO * gutter;
        let win_w = pixel_pitch * cols + gutter * (cols.saturating_sub(1)) + 2 * MARGIN;
        let win_h = pixel_pitch * rows + gutter * (rows.saturating_sub(1)) + 2 * MARGIN;

        let window = Window::new("RGB LED Matrix Emulator", win_w, win_h, WindowOptions::default())?;

        Ok(Self {
            cols,
            rows,
            leds: vec![(0, 0, 0); cols * rows],
            window,
            pixel_pitch,
            gutter,
            win_w,
            win_h,
            framebuf: vec![0u32; win_w * win_h],
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    fn led_origin(&self, col: usize, row: usize) -> (usize, usize) {
        let x = col * (self.pixel_pitch + self.gutter) + MARGIN;
        let y = row * (self.pixel_pitch + self.gutter) + MARGIN;
        (x, y)
    }

    fn fill_rect(&mut self, x0: usize, y0: usize, w: usize, h: usize, rgb: u32) {
        for y in y0..(y0 + h).min(self.win_h) {
            let row_start = y * self.win_w;
            for x in x0..(x0 + w).min(self.win_w) {
                self.framebuf[row_start + x] = rgb;
            }
        }
    }
}

impl crate::toolkit::Canvas for Emulator {
    fn width(&self) -> usize {
        self.cols
    }

    fn height(&self) -> usize {
        self.rows
    }

    fn set(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
        if x >= self.cols || y >= self.rows {
            return;
        }
        self.leds[x + y * self.cols] = (r, g, b);
    }

    fn render(&mut self) {
        let gutter_rgb = u32::from_be_bytes([0, GUTTER_GRAY, GUTTER_GRAY, GUTTER_GRAY]);
        self.framebuf.fill(gutter_rgb);

        let pitch = self.pixel_pitch;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (r, g, b) = self.leds[col + row * self.cols];
                let rgb = u32::from_be_bytes([0, r, g, b]);
                let (x0, y0) = self.led_origin(col, row);
                self.fill_rect(x0, y0, pitch, pitch, rgb);
            }
        }

        let _ = self.window.update_with_buffer(&self.framebuf, self.win_w, self.win_h);
    }
}
