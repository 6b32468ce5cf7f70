use multiscale_transform::config::{load_config, DemoConfig};
use multiscale_transform::diagnostics::{TimingBreakdown, TransformReport};
use multiscale_transform::image::io::{
    load_grayscale_image, save_plane_png, write_json_file, PngRange,
};
use multiscale_transform::image::WorkingFloat;
use multiscale_transform::{Image, MultiscaleLinearTransform, Result, StatusMonitor, TransformError};
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let input = load_grayscale_image(&config.input)?;

    if config.double_precision {
        process::<f64>(&config, &input)
    } else {
        process::<f32>(&config, &input)
    }
}

fn process<F: WorkingFloat>(config: &DemoConfig, input: &Image<u16>) -> Result<()> {
    let mut transform = MultiscaleLinearTransform::<F>::from_params(config.transform.clone())?;
    let mut timings = TimingBreakdown::default();
    let mut monitor = StatusMonitor::new();

    let start = Instant::now();
    transform.decompose_with_monitor(input, &mut monitor)?;
    timings.record("decompose", start.elapsed());

    // full round trip before any layer is disabled
    let start = Instant::now();
    let restored = transform.reconstruct_to_plane()?;
    timings.record("reconstruct", start.elapsed());
    let original = input.selection_to_plane::<F>()?;
    let max_error = original.max_abs_diff(&restored).map(|e| e.widen());

    for &j in &config.disabled_layers {
        transform.disable_layer(j as isize)?;
    }
    let mut partial = Image::<u16>::empty();
    transform.reconstruct_with_monitor(&mut partial, &mut monitor)?;

    let out_dir = &config.output.dir;
    if config.output.save_layers {
        for (j, layer) in transform.layers().enumerate() {
            let Some(layer) = layer else { continue };
            let range = if j == transform.detail_layers() {
                PngRange::Clamp
            } else {
                PngRange::Stretch
            };
            save_plane_png(layer, &out_dir.join(format!("layer_{j:02}.png")), range)?;
        }
    }
    let partial_plane = partial.selection_to_plane::<F>()?;
    let reconstruction_path = out_dir.join(&config.output.reconstruction_image);
    save_plane_png(&partial_plane, &reconstruction_path, PngRange::Clamp)?;

    let mut report = TransformReport::from_transform(&transform, timings);
    report.max_reconstruction_error = max_error;
    let report_path = out_dir.join(&config.output.report_json);
    write_json_file(&report_path, &report)?;

    println!(
        "Decomposed {}x{} into {} layers (max round-trip error {:.3e})",
        input.selection().width(),
        input.selection().height(),
        transform.number_of_layers(),
        max_error.unwrap_or(f64::NAN)
    );
    println!("Saved reconstruction to {}", reconstruction_path.display());
    println!("Saved report to {}", report_path.display());
    Ok(())
}

fn usage() -> TransformError {
    TransformError::Config {
        details: "Usage: multiscale_demo <config.json>".to_string(),
    }
}
