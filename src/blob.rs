use crate::config::SimConfig;
use rand::Rng;
use std::f32::consts::PI;

/// One unit of lava. Canvas space, y grows downward.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Blob {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) r: f32,
    pub(crate) dx: f32,
    pub(crate) dy: f32,
    /// 0 = cold (sinks), 1 = hot (rises).
    pub(crate) temperature: f32,
}

impl Blob {
    /// A cold blob with a small random drift.
    pub(crate) fn new<R: Rng>(x: f32, y: f32, r: f32, rng: &mut R) -> Self {
        Self {
            x,
            y,
            r,
            dx: rng.gen_range(-0.5..0.5),
            dy: rng.gen_range(-0.1..0.1),
            temperature: 0.0,
        }
    }

    pub(crate) fn area(&self) -> f32 {
        PI * self.r * self.r
    }

    pub(crate) fn update(&mut self, cfg: &SimConfig) {
        self.dy += cfg.gravity;

        if self.y > cfg.heat_line() {
            self.temperature += cfg.heating_rate;
            self.dy -= cfg.heat_push;
        } else {
            self.temperature -= cfg.cooling_rate;
        }
        self.temperature = self.temperature.clamp(0.0, 1.0);

        self.dy -= cfg.buoyancy * self.temperature * 2.0;

        self.x += self.dx;
        self.y += self.dy;

        // Bounce off the glass
        if self.x - self.r < 0.0 || self.x + self.r > cfg.width() {
            self.dx = -self.dx;
        }

        let h = cfg.height();
        if self.y - self.r > h {
            self.y = h - self.r;
            self.dy = 0.0;
        } else if self.y + self.r < 0.0 {
            self.y = self.r;
            self.dy = 0.0;
        }
    }

    /// Halves an oversized blob and returns its sibling, placed within one
    /// child radius of the parent. Blobs at or under the split size are left alone.
    pub(crate) fn split<R: Rng>(&mut self, cfg: &SimConfig, rng: &mut R) -> Option<Blob> {
        if self.r <= cfg.split_radius() {
            return None;
        }
        let child_r = (self.area() / 2.0 / PI).sqrt();
        self.r = child_r;
        let x = self.x + rng.gen_range(-child_r..=child_r);
        let y = self.y + rng.gen_range(-child_r..=child_r);
        Some(Blob::new(x, y, child_r, rng))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn still(x: f32, y: f32, r: f32) -> Blob {
        Blob {
            x,
            y,
            r,
            dx: 0.0,
            dy: 0.0,
            temperature: 0.0,
        }
    }

    #[test]
    fn update_keeps_radius_and_clamps_temperature() {
        let cfg = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let mut b = Blob::new(
                rng.gen_range(-10.0..30.0),
                rng.gen_range(-20.0..90.0),
                rng.gen_range(0.5..15.0),
                &mut rng,
            );
            b.temperature = rng.gen_range(0.0..=1.0);
            let r = b.r;
            for _ in 0..50 {
                b.update(&cfg);
                assert_eq!(b.r, r);
                assert!((0.0..=1.0).contains(&b.temperature));
            }
        }
    }

    #[test]
    fn heat_zone_warms_and_lifts() {
        let cfg = SimConfig::default();
        let mut b = still(10.0, 65.0, 5.0);
        b.update(&cfg);
        assert_relative_eq!(b.temperature, 0.02f32);
        // gravity - push - buoyancy * t * 2
        let expected: f32 = 0.02 - 0.05 - 0.05 * 0.02 * 2.0;
        assert_relative_eq!(b.dy, expected, max_relative = 1e-5);
        assert_relative_eq!(b.y, 65.0 + b.dy);
    }

    #[test]
    fn heat_line_itself_is_outside_the_zone() {
        let cfg = SimConfig::default();
        let mut b = still(10.0, cfg.heat_line(), 5.0);
        b.temperature = 0.5;
        b.update(&cfg);
        assert_relative_eq!(b.temperature, 0.49f32, max_relative = 1e-6);
        let expected: f32 = 0.02 - 0.05 * 0.49 * 2.0;
        assert_relative_eq!(b.dy, expected, max_relative = 1e-5);
    }

    #[test]
    fn cools_above_heat_zone() {
        let cfg = SimConfig::default();
        let mut b = still(10.0, 30.0, 5.0);
        b.temperature = 0.5;
        b.update(&cfg);
        assert_relative_eq!(b.temperature, 0.49f32, max_relative = 1e-6);
        let expected: f32 = 0.02 - 0.05 * 0.49 * 2.0;
        assert_relative_eq!(b.dy, expected, max_relative = 1e-5);
    }

    #[test]
    fn temperature_saturates() {
        let cfg = SimConfig::default();
        let mut hot = still(10.0, 65.0, 5.0);
        hot.temperature = 0.995;
        hot.update(&cfg);
        assert_eq!(hot.temperature, 1.0);

        let mut cold = still(10.0, 30.0, 5.0);
        cold.temperature = 0.004;
        cold.update(&cfg);
        assert_eq!(cold.temperature, 0.0);
    }

    #[test]
    fn bounces_off_side_walls() {
        let cfg = SimConfig::default();
        let mut left = still(5.2, 30.0, 5.0);
        left.dx = -0.5;
        left.update(&cfg);
        assert_eq!(left.dx, 0.5);

        let mut right = still(14.8, 30.0, 5.0);
        right.dx = 0.5;
        right.update(&cfg);
        assert_eq!(right.dx, -0.5);

        let mut inside = still(10.0, 30.0, 5.0);
        inside.dx = 0.3;
        inside.update(&cfg);
        assert_eq!(inside.dx, 0.3);
    }

    #[test]
    fn fallen_blob_rests_on_bottom() {
        let cfg = SimConfig::default();
        let mut b = still(10.0, 80.0, 5.0);
        b.dy = 1.0;
        b.update(&cfg);
        assert_eq!(b.y + b.r, cfg.height());
        assert_eq!(b.dy, 0.0);
    }

    #[test]
    fn risen_blob_rests_on_top() {
        let cfg = SimConfig::default();
        let mut b = still(10.0, -10.0, 5.0);
        b.dy = -1.0;
        b.update(&cfg);
        assert_eq!(b.y, b.r);
        assert_eq!(b.dy, 0.0);
    }

    #[test]
    fn area_is_pi_r_squared() {
        assert_relative_eq!(still(0.0, 0.0, 3.0).area(), PI * 9.0);
        assert_relative_eq!(still(0.0, 0.0, 0.5).area(), PI * 0.25);
    }

    #[test]
    fn small_blob_does_not_split() {
        let cfg = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for r in [1.0, 5.0, 11.9, cfg.split_radius()] {
            let mut b = Blob::new(10.0, 30.0, r, &mut rng);
            let before = b.clone();
            assert!(b.split(&cfg, &mut rng).is_none());
            assert_eq!(b, before);
        }
    }

    #[test]
    fn large_blob_splits_in_half() {
        let cfg = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        for r in [12.01, 13.5, 15.0] {
            let mut b = Blob::new(10.0, 30.0, r, &mut rng);
            let before = b.area();
            let child = b.split(&cfg, &mut rng).expect("oversized blob splits");

            assert_relative_eq!(b.area(), before / 2.0, max_relative = 1e-5);
            assert_relative_eq!(child.area(), b.area(), max_relative = 1e-5);
            assert!((child.x - b.x).abs() <= child.r + 1e-4);
            assert!((child.y - b.y).abs() <= child.r + 1e-4);
            assert_eq!(child.temperature, 0.0);
        }
    }
}
