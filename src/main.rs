use std::error::Error;
use std::time::Instant;

use log::{info, warn};

use softscene::camera::{CameraAxis, CameraCommand};
use softscene::engine::{self, Engine};
use softscene::{RenderConfig, SharedScene};

fn main() -> Result<(), Box<dyn Error>> {
    let config = match RenderConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}; using defaults");
            RenderConfig::default()
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    info!(
        "Starting softscene at {}x{}",
        config.surface.width, config.surface.height
    );

    let scene = SharedScene::new(engine::demo_scene(&config)?);
    let mut engine = Engine::new(
        scene,
        &config.timing,
        engine::configured_controller(&config),
    )?;

    // Slow orbit-ish drift so consecutive frames differ.
    let commands = [
        CameraCommand::Pan {
            axis: CameraAxis::Right,
            amount: 1.0,
        },
        CameraCommand::Rotate {
            axis: CameraAxis::Up,
            amount: -0.1,
        },
    ];

    let target = u64::from(config.demo.frames);
    while engine.frames_rendered() < target {
        engine.tick(Instant::now(), &commands)?;
        std::thread::yield_now();
    }

    if let Some(report) = engine.last_report() {
        info!("last second: {} fps, {} ups", report.frames, report.updates);
    }

    match engine.surface().save(&config.demo.output) {
        Ok(()) => info!("wrote {}", config.demo.output.display()),
        Err(e) => {
            warn!("could not write {}: {}", config.demo.output.display(), e);
            return Err(e.into());
        }
    }

    Ok(())
}
