//! Keyboard-controlled snake. Arrow keys steer, Enter ends the game.
//! Input comes from the controlling terminal via `crossterm` raw mode
//! rather than termbox, polled non-blockingly once per tick.

use std::io;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::Context;
use argh::FromArgs;
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal;
use image::{Rgba, RgbaImage};
use rand::Rng;

use ledmatrix::emulator::Emulator;
use ledmatrix::toolkit::{Animation, Canvas, ToolKit};
use ledmatrix::{HardwareConfig, Matrix};

#[derive(FromArgs)]
/// Keyboard-controlled snake.
struct Args {
    /// drive a desktop window instead of real hardware
    #[argh(switch)]
    emulator: bool,

    /// panel/window width
    #[argh(option, default = "32")]
    cols: usize,

    /// panel/window height
    #[argh(option, default = "32")]
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

const NUM_FOODS: usize = 10;
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const FOOD: Rgba<u8> = Rgba([0, 255, 0, 255]);
const SNAKE: Rgba<u8> = Rgba([255, 0, 0, 255]);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy)]
struct Point {
    x: i64,
    y: i64,
}

fn rand_point(w: i64, h: i64) -> Point {
    let mut rng = rand::thread_rng();
    Point { x: rng.gen_range(0..w), y: rng.gen_range(0..h) }
}

struct SnakeAnimation {
    img: RgbaImage,
    w: i64,
    h: i64,
    dir: Direction,
    body: Vec<Point>,
    foods: Vec<Point>,
}

impl SnakeAnimation {
    fn new(w: usize, h: usize) -> Self {
        let (wi, hi) = (w as i64, h as i64);
        Self {
            img: RgbaImage::new(w as u32, h as u32),
            w: wi,
            h: hi,
            dir: Direction::Right,
            body: vec![rand_point(wi, hi)],
            foods: (0..NUM_FOODS).map(|_| rand_point(wi, hi)).collect(),
        }
    }

    fn sync_image(&mut self) {
        for px in self.img.pixels_mut() {
            *px = BLACK;
        }
        for f in &self.foods {
            self.img.put_pixel(f.x as u32, f.y as u32, FOOD);
        }
        for p in &self.body {
            self.img.put_pixel(p.x as u32, p.y as u32, SNAKE);
        }
    }

    fn apply_input(&mut self) -> io::Result<bool> {
        if !event::poll(Duration::from_millis(0))? {
            return Ok(false);
        }
        if let Event::Key(k) = event::read()? {
            match k.code {
                KeyCode::Up if self.dir != Direction::Down => self.dir = Direction::Up,
                KeyCode::Down if self.dir != Direction::Up => self.dir = Direction::Down,
                KeyCode::Left if self.dir != Direction::Right => self.dir = Direction::Left,
                KeyCode::Right if self.dir != Direction::Left => self.dir = Direction::Right,
                KeyCode::Enter => return Ok(true),
                _ => {}
            }
        }
        Ok(false)
    }

    /// Advance the snake one tick. Returns `true` on self-collision.
    fn step(&mut self) -> bool {
        let head = &self.body[0];
        let mut p = Point { x: head.x, y: head.y };
        match self.dir {
            Direction::Up => p.y = (p.y - 1).rem_euclid(self.h),
            Direction::Down => p.y = (p.y + 1).rem_euclid(self.h),
            Direction::Left => p.x = (p.x - 1).rem_euclid(self.w),
            Direction::Right => p.x = (p.x + 1).rem_euclid(self.w),
        }

        let tail = Point { x: self.body[self.body.len() - 1].x, y: self.body[self.body.len() - 1].y };
        let mut collided = false;
        for i in (1..self.body.len()).rev() {
            self.body[i] = Point { x: self.body[i - 1].x, y: self.body[i - 1].y };
            if p.x == self.body[i].x && p.y == self.body[i].y {
                collided = true;
            }
        }
        self.body[0] = Point { x: p.x, y: p.y };
        if collided {
            return true;
        }

        for i in 0..self.foods.len() {
            if p.x == self.foods[i].x && p.y == self.foods[i].y {
                self.body.push(tail);
                self.foods[i] = rand_point(self.w, self.h);
                log::info!("score: {}", self.body.len());
            }
        }
        false
    }
}

impl Animation for SnakeAnimation {
    fn delay(&self) -> Duration {
        Duration::from_millis(150)
    }

    fn image(&self) -> &RgbaImage {
        &self.img
    }

    fn next(&mut self) -> io::Result<()> {
        if self.apply_input()? {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        if self.step() {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        self.sync_image();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    terminal::enable_raw_mode().context("failed to enable terminal raw mode")?;
    let result = run(&args);
    let _ = terminal::disable_raw_mode();
    result
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut sink = open_sink(args.emulator, args.cols, args.rows)?;
    let mut anim = SnakeAnimation::new(sink.width(), sink.height());
    anim.sync_image();

    let cancel = AtomicBool::new(false);
    let mut tk = ToolKit::new(sink.as_mut());
    tk.play_animation(&mut anim, &cancel)?;
    println!("score: {}", anim.body.len());
    Ok(())
}
