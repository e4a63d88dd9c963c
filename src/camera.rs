/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// A monochrome framebuffer drawn with braille characters, two dots wide and four dots tall each.
pub struct Camera {
    /// The dot buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the dot buffer
    w: usize,

    /// Height of the dot buffer
    h: usize,
}

impl Camera {
    /// Create a camera `w` dots wide and `h` dots tall.
    pub fn new(w: usize, h: usize) -> Self {
        // Let `w` and `h` refer to width and height of the dot buffer. Then `bw = ceil(w / 2)`
        // and `bh = ceil(h / 4)` are the width and height of braille characters of our framebuffer.
        // Each braille character is 3 bytes of utf-8, and we need `bh` newlines on top of that.
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));

        Self {
            cb: vec![false; w * h],
            fb: String::with_capacity(3 * (bw * bh) + bh),
            cp: vec![BRAILLE_EMPTY; bw * bh],
            w,
            h,
        }
    }

    /// Create a camera filling `cols` by `rows` terminal characters.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(2 * cols as usize, 4 * rows as usize)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Turns on a single dot. Dots outside the framebuffer are ignored.
    pub fn draw_pixel(&mut self, x: usize, y: usize) {
        if x >= self.w || y >= self.h {
            return;
        }

        let i = self.xy_from(x, y);

        self.cb[i] = true;
    }

    pub fn draw_hline(&mut self, x0: usize, x1: usize, y: usize) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.draw_pixel(x, y);
        }
    }

    pub fn draw_vline(&mut self, x: usize, y0: usize, y1: usize) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.draw_pixel(x, y);
        }
    }

    /// Outline of the rectangle with corners `(x0, y0)` and `(x1, y1)`, both inclusive.
    pub fn draw_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) {
        self.draw_hline(x0, x1, y0);
        self.draw_hline(x0, x1, y1);
        self.draw_vline(x0, y0, y1);
        self.draw_vline(x1, y0, y1);
    }

    pub fn draw_outline(&mut self) {
        if self.w == 0 || self.h == 0 {
            return;
        }

        self.draw_rect(0, 0, self.w - 1, self.h - 1);
    }

    /// Reset the dot buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Turn the dot buffer into lines of braille characters, one `\n` after each line.
    pub fn render(&mut self) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            let (x, y) = self.xy_to(n);
            let hex = Self::get_hex_value(x, y);

            if px {
                self.cp[(y / 4) * bw + (x / 2)] += hex;
            }
        }

        // update framebuffer
        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            // every value in `cp` lies within the braille block
            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }

        if !self.cp.is_empty() {
            self.fb.push('\n');
        }

        &self.fb
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.w, n / self.w)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Camera;

    #[test]
    fn blank() {
        let mut cam = Camera::new(4, 8);

        assert_eq!(cam.render(), "\u{2800}\u{2800}\n\u{2800}\u{2800}\n");
    }

    #[test]
    fn outline() {
        let mut cam = Camera::new(4, 4);
        cam.draw_outline();

        insta::assert_snapshot!(cam.render(), @"⣏⣹");
    }

    #[test]
    fn single_dots() {
        let mut cam = Camera::new(2, 4);

        cam.draw_pixel(0, 0);
        assert_eq!(cam.render(), "\u{2801}\n");

        cam.reset();
        cam.draw_pixel(1, 3);
        assert_eq!(cam.render(), "\u{2880}\n");
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut cam = Camera::new(2, 4);

        cam.draw_pixel(2, 0);
        cam.draw_pixel(0, 4);
        cam.draw_rect(1, 3, 5, 7);

        assert_eq!(cam.render(), "\u{2880}\n");
    }

    #[test]
    fn terminal_size() {
        let cam = Camera::for_terminal(10, 5);

        assert_eq!((cam.width(), cam.height()), (20, 20));
    }
}
