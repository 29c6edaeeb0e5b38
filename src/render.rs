use crate::config::SimConfig;
use crate::field::BlobField;
use crate::surface::{DisplaySurface, Rgb};

/// Where the lava column sits on the screen, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ColumnLayout {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) scale: u32,
    pub(crate) chrome_height: u32,
}

impl ColumnLayout {
    pub(crate) fn centred(cfg: &SimConfig, screen: (u32, u32)) -> Self {
        let width = cfg.canvas_width * cfg.scale;
        let height = cfg.canvas_height * cfg.scale;
        Self {
            x: (screen.0 as i32 - width as i32).div_euclid(2),
            y: (screen.1 as i32 - height as i32).div_euclid(2),
            width,
            height,
            scale: cfg.scale,
            chrome_height: cfg.chrome_rows * cfg.scale,
        }
    }
}

/// Colour of a lit cell: red rises with field strength over a fixed pink base.
pub(crate) fn blob_color(value: f32, gain: f32) -> Rgb {
    let intensity = (value * gain).min(255.0) as u8;
    Rgb::new(intensity, 105, 180)
}

/// Samples the metaball field once per canvas cell and paints the cells
/// above threshold as SCALE×SCALE blocks.
pub(crate) struct Rasterizer {
    layout: ColumnLayout,
    cols: u32,
    rows: u32,
    threshold: f32,
    gain: f32,
}

impl Rasterizer {
    pub(crate) fn new(cfg: &SimConfig, layout: ColumnLayout) -> Self {
        Self {
            layout,
            cols: cfg.canvas_width,
            rows: cfg.canvas_height,
            threshold: cfg.threshold,
            gain: cfg.intensity_gain,
        }
    }

    /// Returns how many cells were lit. Unlit cells are left untouched.
    pub(crate) fn render_frame<S>(&self, field: &BlobField, surface: &mut S) -> usize
    where
        S: DisplaySurface,
    {
        let scale = self.layout.scale;
        let mut lit = 0;
        for y in 0..self.rows {
            let fy = y as f32;
            let sy = self.layout.y + (y * scale) as i32;
            for x in 0..self.cols {
                let v = field.field_value_at(x as f32, fy);
                if v <= self.threshold {
                    continue;
                }
                let c = blob_color(v, self.gain);
                let pen = surface.create_color(c.r, c.g, c.b);
                surface.set_active_color(pen);
                surface.fill_rect(self.layout.x + (x * scale) as i32, sy, scale, scale);
                lit += 1;
            }
        }
        lit
    }
}

/// Light-in-the-middle grey ramp for the lamp's metal caps.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ChromeGradient {
    stops: Vec<Rgb>,
}

impl ChromeGradient {
    /// `half + 1` colours from `dark` up to `light`, mirrored back down.
    pub(crate) fn symmetric(dark: Rgb, light: Rgb, half: usize) -> Self {
        let half = half.max(1);
        let rising: Vec<Rgb> = (0..=half)
            .map(|i| Rgb::lerp(dark, light, i as f32 / half as f32))
            .collect();
        let mut stops = rising.clone();
        stops.extend(rising.iter().rev().skip(1));
        Self { stops }
    }

    pub(crate) fn colors(&self) -> &[Rgb] {
        &self.stops
    }
}

impl Default for ChromeGradient {
    fn default() -> Self {
        Self::symmetric(Rgb::new(50, 50, 50), Rgb::new(200, 200, 200), 6)
    }
}

/// Draws the two gradient caps hugging the top and bottom of the column.
pub(crate) struct ChromeRenderer<C> {
    palette: Vec<C>,
    layout: ColumnLayout,
}

impl<C: Copy> ChromeRenderer<C> {
    pub(crate) fn new<S>(surface: &mut S, gradient: &ChromeGradient, layout: ColumnLayout) -> Self
    where
        S: DisplaySurface<Color = C>,
    {
        let palette = gradient
            .colors()
            .iter()
            .map(|c| surface.create_color(c.r, c.g, c.b))
            .collect();
        Self { palette, layout }
    }

    pub(crate) fn draw_chrome<S>(&self, surface: &mut S)
    where
        S: DisplaySurface<Color = C>,
    {
        let l = self.layout;
        let top = l.y - l.chrome_height as i32;
        let bottom = l.y + l.height as i32;
        let n = self.palette.len();

        for band_y in [top, bottom] {
            for (i, &pen) in self.palette.iter().enumerate() {
                let (x0, x1) = slice_span(i, n, l.width);
                if x1 <= x0 {
                    continue;
                }
                surface.set_active_color(pen);
                surface.fill_rect(l.x + x0 as i32, band_y, x1 - x0, l.chrome_height);
            }
        }
    }
}

/// Pixel range of slice `i` when `width` is cut into `n` near-equal slices
/// with no gap at the right edge.
fn slice_span(i: usize, n: usize, width: u32) -> (u32, u32) {
    let n = n.max(1) as u64;
    let w = width as u64;
    let x0 = i as u64 * w / n;
    let x1 = (i as u64 + 1) * w / n;
    (x0 as u32, x1 as u32)
}
