//! Module for writing output to the screen.
//! Contains the [`Screen`] type, its drawing interface and the terminal frame loop.

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor, event, execute, queue,
    style::{self, Print},
    terminal::{self, ClearType},
};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::{
    cell::{Cell, PIXEL_HEIGHT, PIXEL_WIDTH},
    color::{Color, ColoredCell},
    error::Result,
    event::Event,
    sprite::{Sprite, Texel},
    units::{cell_length, cells_for, index, pos_components},
};

/// A braille framebuffer. Contains public methods to write pixels and sprites,
/// as well as to put the result on the terminal.
///
/// The point (0, 0) represents the top left pixel of the screen.
pub struct Screen {
    cells: Vec<ColoredCell>,
    width: u16,
    height: u16,
    caption: Option<String>,
}

/// A blit type used to select the type of operation when writing a pixel:
/// whether the output pixel is set to 1, set to 0 or flipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blit {
    /// Sets the output bit to 0
    Unset,
    /// Sets the output bit to 1
    Set,
    /// Flips the output bit, i.e. sets 1 to 0 and 0 to 1
    Toggle,
}

/// What a frame loop callback wants to happen next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Input gathered for one iteration of [`Screen::start_loop`].
#[derive(Debug, Default)]
pub struct Frame {
    /// Seconds since the previous frame started.
    pub dt: f32,
    pub events: SmallVec<[Event; 4]>,
}

impl Screen {
    /// Create a new empty screen with the given dimensions in pixels.
    /// The cell grid is rounded up to whole cells.
    pub fn new_pixels(width: u16, height: u16) -> Self {
        Self {
            cells: vec![
                ColoredCell::default();
                cell_length(cells_for(width, PIXEL_WIDTH), cells_for(height, PIXEL_HEIGHT))
            ],
            width,
            height,
            caption: None,
        }
    }

    /// Create a new empty screen covering the given number of terminal cells.
    pub fn new_cells(width: u16, height: u16) -> Self {
        Self::new_pixels(
            width.saturating_mul(PIXEL_WIDTH as u16),
            height.saturating_mul(PIXEL_HEIGHT as u16),
        )
    }

    pub fn cell_width(&self) -> u16 {
        cells_for(self.width, PIXEL_WIDTH)
    }

    pub fn cell_height(&self) -> u16 {
        cells_for(self.height, PIXEL_HEIGHT)
    }

    pub fn pixel_width(&self) -> u16 {
        self.width
    }

    pub fn pixel_height(&self) -> u16 {
        self.height
    }

    /// Changes the screen size in pixels. The contents are cleared.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self {
            caption: self.caption.take(),
            ..Self::new_pixels(width, height)
        };
    }

    /// Blanks every cell.
    pub fn clear(&mut self) {
        self.cells.fill(ColoredCell::default());
    }

    /// Sets a line of text drawn over the top row on [`Screen::render_screen`].
    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }

    /// The caption cut to one row of cells, so it never wraps onto the board.
    fn caption_line(&self) -> Option<&str> {
        let caption = self.caption.as_deref()?;
        let width = self.cell_width() as usize;
        Some(match caption.char_indices().nth(width) {
            Some((end, _)) => &caption[..end],
            None => caption,
        })
    }

    fn pixel_index(&self, x: u16, y: u16) -> (usize, Cell) {
        let ((cell_x, px_x), (cell_y, px_y)) = pos_components(x, y);
        let i = index(cell_x, cell_y, self.cell_width());
        (i, Cell::from_bit_position(px_x, px_y).unwrap_or_default())
    }

    #[allow(unused)]
    fn pixel_at(&self, x: u16, y: u16) -> bool {
        let (i, pixel) = self.pixel_index(x, y);
        self.cells[i].cell.bits & pixel.bits != 0
    }

    /// The color of the cell containing pixel (x, y).
    pub fn color_at(&self, x: u16, y: u16) -> Option<Color> {
        if x < self.width && y < self.height {
            let (i, _) = self.pixel_index(x, y);
            self.cells[i].color
        } else {
            None
        }
    }

    /// Transforms the pixel value at the given coordinates with the given blitting strategy.
    /// Returns `true` if a value was changed, and `false` if the given coordinate was out of bounds.
    pub fn transform_pixel(&mut self, x: u16, y: u16, blit: Blit) -> bool {
        if x < self.width && y < self.height {
            let (i, pixel) = self.pixel_index(x, y);
            let bits = &mut self.cells[i].cell.bits;
            *bits = match blit {
                Blit::Set => *bits | pixel.bits,
                Blit::Unset => *bits & !pixel.bits,
                Blit::Toggle => *bits ^ pixel.bits,
            };
            true
        } else {
            false
        }
    }

    /// Like [`Screen::transform_pixel`], also painting the pixel's cell when a color is given.
    pub fn draw_pixel_colored(&mut self, x: u16, y: u16, blit: Blit, color: Option<Color>) {
        if self.transform_pixel(x, y, blit) && color.is_some() {
            let (i, _) = self.pixel_index(x, y);
            self.cells[i].color = color;
        }
    }

    /// Sets the pixel at the given coordinates to 1 if `value` is `true`, otherwise to 0.
    ///
    /// **Ignores** out-of-bounds input.
    pub fn set(&mut self, x: u16, y: u16, value: bool) {
        self.transform_pixel(x, y, if value { Blit::Set } else { Blit::Unset });
    }

    /// Flips the pixel value at the given coordinates.
    ///
    /// **Ignores** out-of-bounds input.
    pub fn toggle(&mut self, x: u16, y: u16) {
        self.transform_pixel(x, y, Blit::Toggle);
    }

    /// Draws a sprite with its top left corner at pixel (x, y), mirrored horizontally
    /// when `flip` is set. The sprite may hang off any edge of the screen.
    ///
    /// Opaque texels hide what was drawn before: [`Texel::Mask`] clears the pixel and
    /// [`Texel::Ink`] lights it and recolors its cell.
    pub fn draw_sprite(&mut self, sprite: &Sprite, x: i32, y: i32, flip: bool) {
        let width = sprite.width();
        for sy in 0..sprite.height() {
            let Ok(py) = u16::try_from(y + sy as i32) else {
                continue;
            };
            if py >= self.height {
                break;
            }
            for sx in 0..width {
                let Ok(px) = u16::try_from(x + sx as i32) else {
                    continue;
                };
                if px >= self.width {
                    break;
                }
                let tx = if flip { width - 1 - sx } else { sx };
                match sprite.texel(tx, sy) {
                    Texel::Empty => {}
                    Texel::Mask => {
                        self.transform_pixel(px, py, Blit::Unset);
                    }
                    Texel::Ink(color) => self.draw_pixel_colored(px, py, Blit::Set, Some(color)),
                }
            }
        }
    }

    /// Converts the screen to a utf-8 sequence of braille characters, one line per
    /// cell row. Colors are left out.
    pub fn rasterize(&self) -> Vec<u8> {
        let width = self.cell_width() as usize;
        let mut buf = Vec::with_capacity(self.cells.len() * 3 + self.cell_height() as usize);
        for row in self.cells.chunks(width.max(1)) {
            for cell in row {
                buf.extend_from_slice(&cell.cell.to_braille_utf8());
            }
            buf.push(b'\n');
        }
        buf
    }

    /// Switches the terminal to raw mode on the alternate screen and hides the cursor.
    pub fn enter_screen(&self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    /// Restores the terminal to the state it was in before [`Screen::enter_screen`].
    pub fn exit_screen(&self) -> Result<()> {
        execute!(
            io::stdout(),
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Writes the screen, with colors, to the terminal.
    pub fn render_screen(&self) -> Result<()> {
        let mut out = io::stdout().lock();
        let width = self.cell_width() as usize;
        for (y, row) in self.cells.chunks(width.max(1)).enumerate() {
            queue!(out, cursor::MoveTo(0, y as u16), style::ResetColor)?;
            let mut current = None;
            for cell in row {
                if cell.color != current {
                    match cell.color {
                        Some(color) => {
                            queue!(out, style::SetForegroundColor(color.to_crossterm_color()))?
                        }
                        None => queue!(out, style::ResetColor)?,
                    }
                    current = cell.color;
                }
                let bytes = cell.cell.to_braille_utf8();
                queue!(out, Print(std::str::from_utf8(&bytes).unwrap_or(" ")))?;
            }
        }
        if let Some(caption) = self.caption_line() {
            queue!(
                out,
                cursor::MoveTo(0, 0),
                style::ResetColor,
                Print(caption)
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// Runs `tick` about `fps` times per second until it returns [`Flow::Exit`] or the
    /// user interrupts with Ctrl-C, rendering the screen after every tick.
    ///
    /// The terminal is put in raw mode for the duration of the loop and restored
    /// afterwards, even if `tick` fails. Terminal resizes resize the screen to fill
    /// the window before `tick` sees the frame.
    pub fn start_loop<F>(&mut self, fps: u32, mut tick: F) -> Result<()>
    where
        F: FnMut(&mut Screen, &Frame) -> Result<Flow>,
    {
        let frame_time = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        self.enter_screen()?;
        info!(fps, "entered frame loop");
        let result = self.run_frames(frame_time, &mut tick);
        let restored = self.exit_screen();
        info!("left frame loop");
        result.and(restored)
    }

    fn run_frames<F>(&mut self, frame_time: Duration, tick: &mut F) -> Result<()>
    where
        F: FnMut(&mut Screen, &Frame) -> Result<Flow>,
    {
        let mut last = Instant::now();
        loop {
            let deadline = last + frame_time;
            let mut frame = Frame::default();
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                if let Some(e) = Event::from_crossterm_event(event::read()?) {
                    frame.events.push(e);
                }
            }

            let now = Instant::now();
            frame.dt = now.duration_since(last).as_secs_f32();
            last = now;

            for e in &frame.events {
                match *e {
                    Event::Interrupt => {
                        debug!("interrupted");
                        return Ok(());
                    }
                    Event::Resize(columns, rows) => {
                        debug!(columns, rows, "terminal resized");
                        self.resize(
                            columns.saturating_mul(PIXEL_WIDTH as u16),
                            rows.saturating_mul(PIXEL_HEIGHT as u16),
                        );
                        execute!(io::stdout(), terminal::Clear(ClearType::All))?;
                    }
                    _ => (),
                }
            }

            if tick(self, &frame)? == Flow::Exit {
                return Ok(());
            }
            self.render_screen()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::standard;

    #[test]
    fn simple_screen_size() {
        let screen = Screen::new_pixels(16, 24);
        assert_eq!(screen.cell_width(), 8);
        assert_eq!(screen.cell_height(), 6);
    }

    #[test]
    fn odd_screen_size() {
        let screen = Screen::new_pixels(3, 3);
        assert_eq!(screen.cell_width(), 2);
        assert_eq!(screen.cell_height(), 1);
        assert_eq!(Screen::new_cells(4, 2).pixel_height(), 8);
    }

    #[test]
    fn make_square() {
        let mut screen = Screen::new_pixels(8, 8);
        for i in 0..8 {
            screen.set(i, 0, true);
            screen.set(i, 7, true);
            screen.set(0, i, true);
            screen.set(7, i, true);
        }
        assert_eq!(
            std::str::from_utf8(&screen.rasterize()).unwrap(),
            "⡏⠉⠉⢹\n⣇⣀⣀⣸\n"
        )
    }

    #[test]
    fn blit_types() {
        let mut screen = Screen::new_pixels(1, 1);
        assert!(!screen.pixel_at(0, 0));
        screen.set(0, 0, true);
        assert!(screen.pixel_at(0, 0));
        screen.set(0, 0, false);
        assert!(!screen.pixel_at(0, 0));
        screen.toggle(0, 0);
        assert!(screen.pixel_at(0, 0));
        screen.toggle(0, 0);
        assert!(!screen.pixel_at(0, 0));
        assert!(!screen.transform_pixel(1, 0, Blit::Set));
    }

    #[test]
    fn later_sprites_cover_earlier_ones() {
        let back = Sprite::from_rows(&["##", "##"], &[('#', standard::RED)]).unwrap();
        let front = Sprite::from_rows(&["-.", "#."], &[('#', standard::BLUE)]).unwrap();
        let mut screen = Screen::new_pixels(2, 4);
        screen.draw_sprite(&back, 0, 0, false);
        screen.draw_sprite(&front, 0, 0, false);

        assert!(!screen.pixel_at(0, 0), "mask clears");
        assert!(screen.pixel_at(1, 0), "empty keeps");
        assert!(screen.pixel_at(0, 1));
        assert_eq!(screen.color_at(0, 0), Some(standard::BLUE));
    }

    #[test]
    fn flipped_and_clipped_sprite() {
        let sprite = Sprite::from_rows(&["#.."], &[('#', standard::RED)]).unwrap();
        let mut screen = Screen::new_pixels(4, 4);
        screen.draw_sprite(&sprite, 0, 0, true);
        assert!(screen.pixel_at(2, 0));
        assert!(!screen.pixel_at(0, 0));

        // hanging off every edge must not panic
        screen.clear();
        screen.draw_sprite(&sprite, -2, -1, false);
        screen.draw_sprite(&sprite, 3, 3, false);
        screen.draw_sprite(&sprite, 10, 10, true);
        assert!(screen.pixel_at(3, 3));
        assert_eq!(
            std::str::from_utf8(&screen.rasterize()).unwrap(),
            "⠀⢀\n"
        );
    }

    #[test]
    fn resize_clears_and_keeps_caption() {
        let mut screen = Screen::new_pixels(4, 4);
        screen.set_caption(Some("hello".into()));
        screen.set(0, 0, true);
        screen.resize(6, 8);
        assert_eq!(screen.cell_width(), 3);
        assert_eq!(screen.cell_height(), 2);
        assert!(!screen.pixel_at(0, 0));
        assert_eq!(screen.caption.as_deref(), Some("hello"));
    }

    #[test]
    fn caption_fits_one_row() {
        let mut screen = Screen::new_cells(4, 2);
        assert_eq!(screen.caption_line(), None);
        screen.set_caption(Some("trap: ready".into()));
        assert_eq!(screen.caption_line(), Some("trap"));
        screen.set_caption(Some("é…".into()));
        assert_eq!(screen.caption_line(), Some("é…"));
        screen.resize(2, 4);
        assert_eq!(screen.caption_line(), Some("é"));
    }
}
