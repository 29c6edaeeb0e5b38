use crate::blob::Blob;
use crate::config::SimConfig;
use crate::field::BlobField;
use rand::{rngs::StdRng, SeedableRng};

pub(crate) struct Simulator {
    cfg: SimConfig,
    field: BlobField,
    rng: StdRng,
    steps: u64,
    capped: bool,
}

impl Simulator {
    pub(crate) fn new(cfg: SimConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let field = BlobField::initialize(&cfg, cfg.area_fraction, &mut rng);
        log::info!(
            "🫧 Seeded {} blobs covering {:.0} of {:.0} area units",
            field.len(),
            field.total_area(),
            cfg.column_area()
        );
        Self::with_field(cfg, field, rng)
    }

    pub(crate) fn with_field(cfg: SimConfig, field: BlobField, rng: StdRng) -> Self {
        Self {
            cfg,
            field,
            rng,
            steps: 0,
            capped: false,
        }
    }

    /// Advances every blob one tick, then appends whatever split off.
    ///
    /// Children join after the pass, so a blob born this step is first
    /// updated on the next one. Once the field is full, oversized blobs are
    /// left as they are.
    pub(crate) fn step(&mut self) {
        let room = self.field.room();
        let mut children: Vec<Blob> = Vec::new();

        for blob in self.field.blobs_mut() {
            blob.update(&self.cfg);
            if children.len() < room {
                if let Some(child) = blob.split(&self.cfg, &mut self.rng) {
                    children.push(child);
                }
            }
        }

        if !children.is_empty() {
            log::trace!("step {}: {} blobs split", self.steps, children.len());
            self.field.extend(children);
        }

        if !self.capped && self.field.room() == 0 {
            self.capped = true;
            log::info!(
                "Blob population hit its cap of {}, splitting disabled",
                self.field.capacity()
            );
        }

        self.steps += 1;
    }

    pub(crate) fn field(&self) -> &BlobField {
        &self.field
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }
}
