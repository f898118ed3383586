//! Headless demo: animate a grid and log frame statistics.
//!
//! ```text
//! vecflow [settings.json] [frames]
//! RUST_LOG=debug vecflow demo.json 600
//! ```

use std::env;
use std::error::Error;
use vecflow::culling::VectorDims;
use vecflow::instance;
use vecflow::scheduler::{AnimationLoop, FixedStep};
use vecflow::{demo_grid, AnimationSettings, FieldType};

const DEFAULT_FRAMES: u64 = 300;
const GRID_SPACING: f64 = 25.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let settings = match args.next() {
        Some(path) => {
            log::info!("Loading settings from {}", path);
            AnimationSettings::load(&path)?
        }
        None => AnimationSettings::new(FieldType::SmoothWaves, 800.0, 600.0),
    };
    let frames = match args.next() {
        Some(n) => n.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };

    let vectors = demo_grid(settings.canvas_width, settings.canvas_height, GRID_SPACING);
    log::info!(
        "Animating {} vectors with {} on {}x{} for {} frames",
        vectors.len(),
        settings.field_type,
        settings.canvas_width,
        settings.canvas_height,
        frames
    );

    let field = settings.field_type;
    let dims = VectorDims::default();
    let mut host = AnimationLoop::new(FixedStep::fps(60.0).with_limit(frames), vectors, settings);
    let mut uploaded = 0usize;

    let summary = host.run(|commit| {
        let instances = instance::pack(commit.visible, &dims, field);
        uploaded += instance::as_bytes(&instances).len();
        let simplified = commit.visible.iter().filter(|v| v.simplified).count();
        log::debug!(
            "frame {:>5} t={:>8.1}ms visible {}/{} simplified {}",
            commit.frame,
            commit.time,
            commit.visible.len(),
            commit.total,
            simplified
        );
    });

    let mean_length = host
        .vectors()
        .iter()
        .map(|v| v.length_factor)
        .sum::<f64>()
        / host.vectors().len().max(1) as f64;
    log::info!(
        "Done: {} frames, {} commits, {:.1}ms animated, {} bytes packed, mean length factor {:.3}",
        summary.frames,
        summary.commits,
        summary.elapsed,
        uploaded,
        mean_length
    );
    Ok(())
}
