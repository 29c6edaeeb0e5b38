use crate::blob::Blob;
use crate::config::SimConfig;
use rand::Rng;
use std::f32::consts::PI;

/// Every live blob plus the canvas they move in.
///
/// The population only grows (splits add, nothing removes), so the field
/// carries an explicit capacity; the simulator stops splitting once it is full.
#[derive(Clone, Debug)]
pub(crate) struct BlobField {
    blobs: Vec<Blob>,
    width: f32,
    height: f32,
    capacity: usize,
}

impl BlobField {
    pub(crate) fn empty(cfg: &SimConfig) -> Self {
        Self {
            blobs: Vec::new(),
            width: cfg.width(),
            height: cfg.height(),
            capacity: cfg.max_blobs,
        }
    }

    /// Fills the canvas with small blobs until their combined area reaches
    /// `fraction` of the column area. The last blob is shrunk to land on the
    /// budget exactly.
    pub(crate) fn initialize<R: Rng>(cfg: &SimConfig, fraction: f32, rng: &mut R) -> Self {
        let mut field = Self::empty(cfg);
        let mut remaining = fraction * cfg.column_area();

        while remaining > 0.0 {
            let mut r = rng.gen_range(cfg.min_radius..cfg.min_radius + 2.0);
            let mut area = PI * r * r;
            if area > remaining {
                r = (remaining / PI).sqrt();
                area = remaining;
            }
            let x = place(r, field.width, rng);
            let y = place(r, field.height, rng);
            field.blobs.push(Blob::new(x, y, r, rng));
            remaining -= area;
        }

        field
    }

    #[cfg(test)]
    pub(crate) fn from_blobs(cfg: &SimConfig, blobs: Vec<Blob>) -> Self {
        Self {
            blobs,
            ..Self::empty(cfg)
        }
    }

    /// Metaball potential at a canvas point: sum of r / (d² + 1).
    ///
    /// A blob centred exactly on the sample point is skipped rather than
    /// contributing its peak value.
    pub(crate) fn field_value_at(&self, x: f32, y: f32) -> f32 {
        let mut value = 0.0;
        for b in &self.blobs {
            let dx = x - b.x;
            let dy = y - b.y;
            let d2 = dx * dx + dy * dy;
            if d2 > 0.0 {
                value += b.r / (d2 + 1.0);
            }
        }
        value
    }

    pub(crate) fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub(crate) fn blobs_mut(&mut self) -> &mut [Blob] {
        &mut self.blobs
    }

    pub(crate) fn len(&self) -> usize {
        self.blobs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many more blobs fit before splitting is disabled.
    pub(crate) fn room(&self) -> usize {
        self.capacity.saturating_sub(self.blobs.len())
    }

    /// Appends split children, dropping any beyond capacity. Callers split at
    /// most `room()` parents, since a dropped child takes its half of the
    /// parent's area with it.
    pub(crate) fn extend(&mut self, children: Vec<Blob>) {
        let room = self.room();
        debug_assert!(
            children.len() <= room,
            "{} children, room for {}",
            children.len(),
            room
        );
        self.blobs.extend(children.into_iter().take(room));
    }

    pub(crate) fn total_area(&self) -> f32 {
        self.blobs.iter().map(Blob::area).sum()
    }
}

/// Uniform centre coordinate keeping a blob of radius `r` inside `0..extent`.
fn place<R: Rng>(r: f32, extent: f32, rng: &mut R) -> f32 {
    let (lo, hi) = (r, extent - r);
    if lo < hi {
        rng.gen_range(lo..hi)
    } else {
        extent / 2.0
    }
}
