use clap::Parser;
use std::time::Duration;
use thiserror::Error;

/// Largest screen side, in pixels. Keeps half-block rows inside `u16`.
const MAX_SCREEN_SIDE: u32 = 4096;

#[derive(Parser, Debug, Clone)]
#[command(name = "lavalamp")]
#[command(about = "Metaball lava lamp for the terminal", long_about = None)]
pub(crate) struct Args {
    /// RNG seed (random when omitted)
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// screen pixels per canvas cell
    #[arg(long, default_value_t = 1)]
    pub(crate) scale: u32,

    /// ms to sleep between frames
    #[arg(long, default_value_t = 10)]
    pub(crate) ms: u64,

    /// stop splitting blobs once this many exist
    #[arg(long, default_value_t = 256)]
    pub(crate) max_blobs: usize,

    /// share of the column filled with lava at start
    #[arg(long, default_value_t = 0.05)]
    pub(crate) area_fraction: f32,

    /// stop after N frames (runs until Ctrl-C otherwise)
    #[arg(long)]
    pub(crate) frames: Option<u64>,

    /// render into memory and print a summary instead of drawing to the terminal
    #[arg(long, default_value_t = false)]
    pub(crate) headless: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum ConfigError {
    #[error("scale must be at least 1")]
    ZeroScale,

    #[error("scale {scale} makes a screen side longer than {max} pixels")]
    ScaleTooLarge { scale: u32, max: u32 },

    #[error("radius bounds must satisfy 0 < min < max, got {min}..{max}")]
    RadiusBounds { min: f32, max: f32 },

    #[error("blobs of radius {radius} do not fit a {width}x{height} canvas")]
    CanvasTooSmall { radius: f32, width: u32, height: u32 },

    #[error("area fraction must be in (0, 1], got {0}")]
    AreaFraction(f32),

    #[error("max blob count must be at least 1")]
    NoBlobCapacity,
}

/// Immutable simulation and layout constants, shared by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SimConfig {
    pub(crate) canvas_width: u32,
    pub(crate) canvas_height: u32,
    /// Screen pixels per canvas cell.
    pub(crate) scale: u32,
    pub(crate) screen_width: u32,
    pub(crate) screen_height: u32,

    pub(crate) gravity: f32,
    pub(crate) buoyancy: f32,
    /// Bottom share of the canvas that heats blobs.
    pub(crate) heat_zone: f32,
    pub(crate) heating_rate: f32,
    pub(crate) cooling_rate: f32,
    pub(crate) heat_push: f32,

    pub(crate) min_radius: f32,
    pub(crate) max_radius: f32,
    pub(crate) split_ratio: f32,
    pub(crate) area_fraction: f32,
    /// Pixels per canvas unit on the 480x480 panel the area budget was tuned on.
    pub(crate) budget_scale: f32,
    pub(crate) max_blobs: usize,

    pub(crate) threshold: f32,
    pub(crate) intensity_gain: f32,
    /// Height of each chrome band, in canvas rows.
    pub(crate) chrome_rows: u32,

    pub(crate) frame_interval: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            canvas_width: 20,
            canvas_height: 70,
            scale: 1,
            screen_width: 0,
            screen_height: 0,

            gravity: 0.02,
            buoyancy: 0.05,
            heat_zone: 0.15,
            heating_rate: 0.02,
            cooling_rate: 0.01,
            heat_push: 0.05,

            min_radius: 5.0,
            max_radius: 15.0,
            split_ratio: 0.8,
            area_fraction: 0.05,
            budget_scale: 6.0,
            max_blobs: 256,

            threshold: 2.5,
            intensity_gain: 50.0,
            chrome_rows: 10,

            frame_interval: Duration::from_millis(10),
        }
        .fit_screen()
    }
}

impl SimConfig {
    pub(crate) fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let cfg = Self {
            scale: args.scale,
            frame_interval: Duration::from_millis(args.ms),
            max_blobs: args.max_blobs,
            area_fraction: args.area_fraction,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg.fit_screen())
    }

    /// Sizes the screen to hold the column and both chrome bands.
    pub(crate) fn fit_screen(mut self) -> Self {
        self.screen_width = self.canvas_width * self.scale;
        self.screen_height = (self.canvas_height + 2 * self.chrome_rows) * self.scale;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.scale == 0 {
            return Err(ConfigError::ZeroScale);
        }
        let tallest = self
            .canvas_width
            .max(self.canvas_height.saturating_add(self.chrome_rows.saturating_mul(2)));
        if tallest.saturating_mul(self.scale) > MAX_SCREEN_SIDE {
            return Err(ConfigError::ScaleTooLarge {
                scale: self.scale,
                max: MAX_SCREEN_SIDE,
            });
        }
        if !(self.min_radius > 0.0 && self.min_radius < self.max_radius) {
            return Err(ConfigError::RadiusBounds {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        // Initial blobs are drawn from min..min+2 and must fit inside the canvas.
        let widest = self.min_radius + 2.0;
        if 2.0 * widest > self.width() || 2.0 * widest > self.height() {
            return Err(ConfigError::CanvasTooSmall {
                radius: widest,
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if !(self.area_fraction > 0.0 && self.area_fraction <= 1.0) {
            return Err(ConfigError::AreaFraction(self.area_fraction));
        }
        if self.max_blobs == 0 {
            return Err(ConfigError::NoBlobCapacity);
        }
        Ok(())
    }

    pub(crate) fn width(&self) -> f32 {
        self.canvas_width as f32
    }

    pub(crate) fn height(&self) -> f32 {
        self.canvas_height as f32
    }

    /// Blobs below this line are in the heat zone.
    pub(crate) fn heat_line(&self) -> f32 {
        self.height() - self.height() * self.heat_zone
    }

    /// Blobs strictly larger than this split.
    pub(crate) fn split_radius(&self) -> f32 {
        self.max_radius * self.split_ratio
    }

    pub(crate) fn column_area(&self) -> f32 {
        self.width() * self.height() * self.budget_scale * self.budget_scale
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args() -> Args {
        Args::parse_from(["lavalamp"])
    }

    #[test]
    fn defaults_match_reference_lamp() {
        let cfg = SimConfig::from_args(&args()).unwrap();
        assert_eq!((cfg.canvas_width, cfg.canvas_height), (20, 70));
        assert_eq!((cfg.screen_width, cfg.screen_height), (20, 90));
        assert_eq!(cfg.frame_interval, Duration::from_millis(10));
        assert_eq!(cfg.split_radius(), 12.0);
        assert_eq!(cfg.column_area(), 50_400.0);
    }

    #[test]
    fn screen_follows_scale() {
        let cfg = SimConfig::from_args(&Args::parse_from(["lavalamp", "--scale", "3"])).unwrap();
        assert_eq!((cfg.screen_width, cfg.screen_height), (60, 270));
    }

    #[test]
    fn rejects_zero_scale() {
        let err = SimConfig::from_args(&Args::parse_from(["lavalamp", "--scale", "0"]));
        assert_eq!(err, Err(ConfigError::ZeroScale));
    }

    #[test]
    fn rejects_huge_scale() {
        for scale in ["50000000", "2000", "46"] {
            let err = SimConfig::from_args(&Args::parse_from(["lavalamp", "--scale", scale]));
            assert!(
                matches!(err, Err(ConfigError::ScaleTooLarge { max: 4096, .. })),
                "scale {scale}: {err:?}"
            );
        }
        let cfg = SimConfig::from_args(&Args::parse_from(["lavalamp", "--scale", "45"])).unwrap();
        assert_eq!(cfg.screen_height, 4050);
    }

    #[test]
    fn rejects_bad_area_fraction() {
        let err =
            SimConfig::from_args(&Args::parse_from(["lavalamp", "--area-fraction", "1.5"]));
        assert_eq!(err, Err(ConfigError::AreaFraction(1.5)));
    }

    #[test]
    fn rejects_inverted_radii() {
        let cfg = SimConfig {
            min_radius: 15.0,
            max_radius: 5.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RadiusBounds { .. })
        ));
    }

    #[test]
    fn rejects_canvas_narrower_than_blobs() {
        let cfg = SimConfig {
            canvas_width: 12,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::CanvasTooSmall { width: 12, .. })
        ));
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = SimConfig::from_args(&Args::parse_from(["lavalamp", "--max-blobs", "0"]));
        assert_eq!(err, Err(ConfigError::NoBlobCapacity));
    }
}
