//! Drawing toolkit: a thin image-drawing convenience layer over anything
//! that satisfies [`Canvas`] (both [`crate::matrix::Matrix`] and
//! [`crate::emulator::Emulator`] do). None of this is on the hot path;
//! it exists for the demos under `demos/`.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use image::RgbaImage;

/// The minimal surface the toolkit needs from a drawable sink: the image-
/// sink contract described for `Matrix`, shared with the desktop emulator.
pub trait Canvas {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8);
    fn render(&mut self);
}

/// One pre-decoded, pre-resized image with how long to hold it.
pub struct Frame {
    pub image: RgbaImage,
    pub delay: Duration,
}

/// A source of frames driven at its own pace (e.g. a cellular automaton or
/// a fractal zoom), as opposed to a fixed, pre-decoded [`Frame`] sequence.
pub trait Animation {
    fn delay(&self) -> Duration;
    fn image(&self) -> &RgbaImage;
    /// Advance one step. `Err` with `ErrorKind::UnexpectedEof` signals a
    /// clean end of animation, any other error aborts playback.
    fn next(&mut self) -> io::Result<()>;
}

pub struct ToolKit<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> ToolKit<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        Self { canvas }
    }

    /// Blit `img` at the origin, clipping to whichever of `img` or the
    /// canvas is smaller, then commit.
    pub fn draw_image(&mut self, img: &RgbaImage) {
        let w = self.canvas.width().min(img.width() as usize);
        let h = self.canvas.height().min(img.height() as usize);
        for y in 0..h {
            for x in 0..w {
                let p = img.get_pixel(x as u32, y as u32);
                self.canvas.set(x, y, p[0], p[1], p[2]);
            }
        }
        self.canvas.render();
    }

    /// Draw a fixed sequence of frames, looping `loop_count` times
    /// (`0` means forever), until `cancel` is set.
    pub fn play_frames(&mut self, frames: &[Frame], loop_count: usize, cancel: &AtomicBool) {
        if frames.is_empty() {
            return;
        }
        let mut completed_loops = 0usize;
        let mut i = 0usize;
        loop {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            self.draw_image(&frames[i].image);
            std::thread::sleep(frames[i].delay);
            i += 1;
            if i >= frames.len() {
                i = 0;
                if loop_count > 0 {
                    completed_loops += 1;
                    if completed_loops >= loop_count {
                        return;
                    }
                }
            }
        }
    }

    /// Drive a self-paced [`Animation`] at its reported frame delay until
    /// it signals end-of-animation, errors, or `cancel` is set.
    pub fn play_animation(&mut self, anim: &mut dyn Animation, cancel: &AtomicBool) -> io::Result<()> {
        let delay = anim.delay();
        let mut next_tick = Instant::now();
        loop {
            if cancel.load(Ordering::Relaxed) {
                return Ok(());
            }
            match anim.next() {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e),
            }
            self.draw_image(anim.image());

            next_tick += delay;
            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            } else {
                next_tick = now;
            }
        }
    }

    /// Decode every frame of an animated GIF, resize each to the canvas
    /// bounds, and play them with [`ToolKit::play_frames`] until
    /// `cancel` is set. Loops forever; GIF loop-count metadata isn't
    /// surfaced by the decoder this crate uses.
    pub fn play_gif<R: io::Read>(&mut self, reader: R, cancel: &AtomicBool) -> image::ImageResult<()> {
        use image::codecs::gif::GifDecoder;
        use image::{AnimationDecoder, imageops::FilterType};

        let decoder = GifDecoder::new(reader)?;
        let (w, h) = (self.canvas.width() as u32, self.canvas.height() as u32);

        let mut frames = Vec::new();
        for frame in decoder.into_frames() {
            let frame = frame?;
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay = Duration::from_millis((numer / denom.max(1)) as u64);
            let resized = image::imageops::resize(frame.buffer(), w, h, FilterType::Lanczos3);
            frames.push(Frame { image: resized, delay });
        }

        self.play_frames(&frames, 0, cancel);
        Ok(())
    }
}
