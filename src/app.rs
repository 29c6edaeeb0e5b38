use crate::config::{Args, SimConfig};
use crate::frame::FrameLoop;
use crate::sim::Simulator;
use crate::surface::FrameBuffer;
use crate::terminal::TerminalSurface;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let cfg = SimConfig::from_args(&args).context("invalid lamp configuration")?;
    let seed = args.seed.unwrap_or_else(rand::random);

    log::info!("✨ Starting lava lamp (seed {})", seed);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("could not install Ctrl-C handler")?;

    let sim = Simulator::new(cfg, seed);

    if args.headless {
        let surface = FrameBuffer::new(cfg.screen_width, cfg.screen_height);
        let mut lamp = FrameLoop::new(&cfg, surface, sim);
        let frames = lamp.run(&running, args.frames)?;
        let field = lamp.simulator().field();
        let mean_temp = if field.is_empty() {
            0.0
        } else {
            field.blobs().iter().map(|b| b.temperature).sum::<f32>() / field.len() as f32
        };
        println!(
            "seed {}: {} frames presented, {} blobs, lava area {:.0}, mean temperature {:.2}",
            seed,
            lamp.surface().presented(),
            field.len(),
            field.total_area(),
            mean_temp
        );
        log::info!(
            "Stopped after {} frames ({} steps)",
            frames,
            lamp.simulator().steps()
        );
        return Ok(());
    }

    let surface = TerminalSurface::begin(cfg.screen_width, cfg.screen_height)
        .context("could not set up the terminal")?;
    let mut lamp = FrameLoop::new(&cfg, surface, sim);
    let result = lamp.run(&running, args.frames);
    lamp.surface_mut()
        .end()
        .context("could not restore the terminal")?;
    let frames = result.context("frame loop failed")?;
    log::info!("Stopped after {} frames", frames);
    Ok(())
}
