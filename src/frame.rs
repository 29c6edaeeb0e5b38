use crate::config::SimConfig;
use crate::render::{ChromeGradient, ChromeRenderer, ColumnLayout, Rasterizer};
use crate::sim::Simulator;
use crate::surface::DisplaySurface;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const STATS_EVERY: u64 = 600;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameStats {
    pub(crate) lit_cells: usize,
    pub(crate) blobs: usize,
}

/// clear -> chrome -> lava -> physics -> present -> sleep, forever.
pub(crate) struct FrameLoop<S: DisplaySurface> {
    surface: S,
    sim: Simulator,
    raster: Rasterizer,
    chrome: ChromeRenderer<S::Color>,
    background: S::Color,
    interval: Duration,
    frames: u64,
}

impl<S: DisplaySurface> FrameLoop<S> {
    pub(crate) fn new(cfg: &SimConfig, mut surface: S, sim: Simulator) -> Self {
        let layout = ColumnLayout::centred(cfg, surface.size());
        log::info!(
            "📐 Column {}x{} at ({}, {}) on a {}x{} surface",
            layout.width,
            layout.height,
            layout.x,
            layout.y,
            surface.size().0,
            surface.size().1
        );
        let background = surface.create_color(0, 0, 0);
        let chrome = ChromeRenderer::new(&mut surface, &ChromeGradient::default(), layout);
        Self {
            surface,
            sim,
            raster: Rasterizer::new(cfg, layout),
            chrome,
            background,
            interval: cfg.frame_interval,
            frames: 0,
        }
    }

    /// Draws and presents one frame, stepping the simulation in between.
    pub(crate) fn tick(&mut self) -> io::Result<FrameStats> {
        self.surface.set_active_color(self.background);
        self.surface.clear();
        self.chrome.draw_chrome(&mut self.surface);
        let lit_cells = self.raster.render_frame(self.sim.field(), &mut self.surface);
        self.sim.step();
        self.surface.present()?;
        self.frames += 1;

        let stats = FrameStats {
            lit_cells,
            blobs: self.sim.field().len(),
        };
        if self.frames % STATS_EVERY == 0 {
            log::debug!(
                "frame {}: {} blobs, {} lit cells",
                self.frames,
                stats.blobs,
                stats.lit_cells
            );
        }
        Ok(stats)
    }

    /// Ticks until `running` is cleared or `limit` frames have been shown.
    pub(crate) fn run(&mut self, running: &AtomicBool, limit: Option<u64>) -> io::Result<u64> {
        let start = self.frames;
        while running.load(Ordering::SeqCst) {
            if limit.is_some_and(|n| self.frames - start >= n) {
                break;
            }
            self.tick()?;
            if !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }
        }
        Ok(self.frames - start)
    }

    pub(crate) fn simulator(&self) -> &Simulator {
        &self.sim
    }

    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
