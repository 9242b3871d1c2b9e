use clap::Parser;
use physarum_lib::cli::Cli;
use physarum_lib::colormap::load_colormap;
use physarum_lib::config::RunConfig;
use physarum_lib::encoder::EncoderPipe;
use physarum_lib::engine::{Engine, EngineParams};
use physarum_lib::errors::RunError;
use physarum_lib::ppm::write_ppm_frame;
use physarum_lib::render::render_frame;
use std::sync::mpsc;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), RunError> {
    let cli = Cli::parse();

    let mut config = RunConfig::default();
    if let Some(path) = &cli.config {
        config = config.merge(RunConfig::load_overlay(path)?);
    }
    config = config.merge(cli.to_overlay());

    config.behavior.validate().map_err(RunError::Simulation)?;

    let colormap = load_colormap(std::path::Path::new("colormap.csv"))
        .unwrap_or_else(|_| vec![(0, 0, 0), (255, 255, 255)]);

    let engine_params = EngineParams {
        width: config.width,
        height: config.height,
        fps: config.fps,
        resolution_factor: config.resolution_factor,
        frames: config.frames(),
        nagents: config.nagents,
    };

    let (tx, rx) = mpsc::channel();
    let mut engine =
        Engine::new(engine_params, config.behavior, None, tx, 1).map_err(RunError::Simulation)?;
    let trail_max = engine.behavior().trail_max;

    let mut encoder = EncoderPipe::spawn(
        "ffmpeg",
        &[
            "-y".to_string(),
            "-f".to_string(),
            "image2pipe".to_string(),
            "-i".to_string(),
            "-".to_string(),
            config.output_file.clone(),
        ],
    )?;

    let render_thread = std::thread::spawn(move || -> Result<(), RunError> {
        for snapshot in rx {
            let rgb = render_frame(
                &snapshot.grid_snapshot,
                snapshot.width,
                snapshot.height,
                snapshot.width,
                snapshot.height,
                &colormap,
                0.0,
                trail_max,
            );
            let mut frame_bytes = Vec::new();
            write_ppm_frame(&mut frame_bytes, snapshot.width, snapshot.height, &rgb)?;
            encoder.write_frame(&frame_bytes)?;
        }
        encoder.finish()?;
        Ok(())
    });

    engine.run();
    drop(engine);

    render_thread
        .join()
        .unwrap_or_else(|_| Err(RunError::Config("render thread panicked".to_string())))?;

    Ok(())
}
