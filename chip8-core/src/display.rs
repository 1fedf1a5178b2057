/// Screen width, in pixels
pub const WIDTH: usize = 64;

/// Screen height, in pixels
pub const HEIGHT: usize = 32;

/// Monochrome 64×32 framebuffer, stored row-major
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer([bool; WIDTH * HEIGHT]);

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Builds a blank framebuffer
    pub const fn new() -> Self {
        Self([false; WIDTH * HEIGHT])
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.0.fill(false);
    }

    /// Reads a single pixel; out-of-range coordinates read as unlit
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.0[y * WIDTH + x]
    }

    /// Borrows the pixels, row-major
    #[inline]
    pub fn pixels(&self) -> &[bool] {
        &self.0
    }

    /// Iterates over rows of pixels, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.0.chunks_exact(WIDTH)
    }

    /// XORs an 8-pixel-wide sprite onto the screen
    ///
    /// The origin wraps around the screen; pixels that would land past the
    /// right or bottom edge are clipped.  Returns `true` if any lit pixel
    /// was turned off.
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x0 = usize::from(x) % WIDTH;
        let y0 = usize::from(y) % HEIGHT;
        let mut collision = false;
        for (dy, &row) in sprite.iter().enumerate() {
            let y = y0 + dy;
            if y >= HEIGHT {
                break;
            }
            for dx in 0..8 {
                let x = x0 + dx;
                if x >= WIDTH {
                    break;
                }
                if row & (0x80 >> dx) != 0 {
                    let p = &mut self.0[y * WIDTH + x];
                    collision |= *p;
                    *p = !*p;
                }
            }
        }
        collision
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FrameBuffer(\n{self})")
    }
}

/// Renders the screen as text, one line per row, with `#` for lit pixels
impl core::fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use core::fmt::Write;
        for row in self.rows() {
            for p in row {
                f.write_char(if *p { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn xor_and_collision() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw(0, 0, &[0b1010_0000]));
        assert!(fb.get(0, 0));
        assert!(!fb.get(1, 0));
        assert!(fb.get(2, 0));

        assert!(fb.draw(1, 0, &[0b1100_0000]));
        assert!(fb.get(1, 0));
        assert!(!fb.get(2, 0));
    }

    #[test]
    fn origin_wraps() {
        let mut fb = FrameBuffer::new();
        fb.draw(64 + 3, 32 + 4, &[0x80]);
        assert!(fb.get(3, 4));
        assert_eq!(fb.pixels().iter().filter(|p| **p).count(), 1);
    }

    #[test]
    fn edges_clip() {
        let mut fb = FrameBuffer::new();
        fb.draw(60, 30, &[0xFF; 4]);
        let lit = fb.pixels().iter().filter(|p| **p).count();
        assert_eq!(lit, 4 * 2);
        assert!(fb.get(63, 31));
        assert!(!fb.get(0, 0));
        assert!(!fb.get(0, 30));
    }

    #[test]
    fn text_rendering() {
        let mut fb = FrameBuffer::new();
        fb.draw(1, 0, &[0x80]);
        let s = fb.to_string();
        let first = s.lines().next().unwrap();
        assert_eq!(first.len(), WIDTH);
        assert!(first.starts_with(".#.."));
        assert_eq!(s.lines().count(), HEIGHT);
    }
}
