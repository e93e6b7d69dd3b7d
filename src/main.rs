use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracemill::{init_logging, load_tasks, pipeline_for, write_programs, Flip, TraceMillConfig};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Gerber and Excellon drawings of one board
    #[arg(value_name = "DRAWING", required = true)]
    inputs: Vec<PathBuf>,

    /// Configuration file (TOML or JSON); defaults to the user config when present
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for the generated programs
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Mirror every program (none, x, y, both)
    #[arg(long)]
    flip: Option<Flip>,

    /// Keep only motion and comment lines, for previewing toolpaths
    #[arg(long)]
    render_only: bool,

    /// Print the per task timing log
    #[arg(long)]
    timings: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<TraceMillConfig> {
    if let Some(path) = &cli.config {
        return TraceMillConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration {:?}", path));
    }
    match tracemill_settings::default_config_path() {
        Some(path) if path.exists() => TraceMillConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load configuration {:?}", path)),
        _ => Ok(TraceMillConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = load_config(&cli)?;
    if cli.render_only {
        config.render_only_paths = true;
    }

    let tasks = load_tasks(&cli.inputs, &config, cli.flip)?;
    let pipeline = pipeline_for(&config)?;
    let result = pipeline.run(&tasks).await?;

    if cli.timings {
        for line in &result.timings {
            println!("{}", line);
        }
    }

    let output = cli
        .output
        .or_else(|| config.output_directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let written = write_programs(&result, &config, &output)?;

    println!(
        "Generated {} programs ({}, {:.2} x {:.2})",
        written.len(),
        result.units,
        result.bounds.width() as f64 / result.geometry_scale,
        result.bounds.height() as f64 / result.geometry_scale
    );
    Ok(())
}
