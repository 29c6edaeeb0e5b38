use std::io;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp1 = |x: u8, y: u8| -> u8 {
            (x as f32 + (y as f32 - x as f32) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: lerp1(a.r, b.r),
            g: lerp1(a.g, b.g),
            b: lerp1(a.b, b.b),
        }
    }
}

/// Whatever the lamp is drawn onto: a panel, a terminal, a test buffer.
///
/// Drawing uses a current colour, like a pen. Coordinates are surface pixels
/// and may fall partly or wholly off the surface; implementations clip.
pub(crate) trait DisplaySurface {
    type Color: Copy;

    fn create_color(&mut self, r: u8, g: u8, b: u8) -> Self::Color;
    fn set_active_color(&mut self, color: Self::Color);
    /// Fills the whole surface with the active colour.
    fn clear(&mut self);
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32);
    fn present(&mut self) -> io::Result<()>;
    fn size(&self) -> (u32, u32);
}

/// In-memory RGB surface.
pub(crate) struct FrameBuffer {
    w: u32,
    h: u32,
    px: Vec<Rgb>,
    active: Rgb,
    presented: u64,
}

impl FrameBuffer {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb::BLACK; (w as usize) * (h as usize)],
            active: Rgb::BLACK,
            presented: 0,
        }
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.w || y >= self.h {
            return None;
        }
        Some(self.px[(y as usize) * (self.w as usize) + (x as usize)])
    }

    pub(crate) fn presented(&self) -> u64 {
        self.presented
    }
}

impl DisplaySurface for FrameBuffer {
    type Color = Rgb;

    fn create_color(&mut self, r: u8, g: u8, b: u8) -> Rgb {
        Rgb::new(r, g, b)
    }

    fn set_active_color(&mut self, color: Rgb) {
        self.active = color;
    }

    fn clear(&mut self) {
        self.px.fill(self.active);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.w as i64);
        let y1 = (y as i64 + h as i64).min(self.h as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.w as usize;
        for yy in y0 as usize..y1 as usize {
            let row = yy * stride;
            self.px[row + x0 as usize..row + x1 as usize].fill(self.active);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.w, self.h)
    }
}
