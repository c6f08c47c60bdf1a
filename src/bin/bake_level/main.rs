use anyhow::Context;
use clap::Parser;
use hamster_level::config::BakeConfig;

mod cli;

use cli::CliArgs;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    log::trace!("Starting with args: {:?}", args);

    let file_config = match &args.config {
        Some(path) => BakeConfig::from_json_file(path)?,
        None => BakeConfig::default(),
    };
    let config = args.apply(file_config);
    let output = args.output_path();
    log::debug!("effective config: {}", serde_json::to_string(&config)?);

    let summary = hamster_level::bake_file(&args.input, &output, &config).with_context(|| {
        format!(
            "failed to bake {} into {}",
            args.input.display(),
            output.display()
        )
    })?;

    log::info!(
        "done: {} ref point(s), {} spline(s), {} light(s), {} mesh(es), {} vertices, {} texture(s)",
        summary.ref_points,
        summary.splines,
        summary.lights,
        summary.meshes,
        summary.vertices,
        summary.textures
    );
    Ok(())
}
