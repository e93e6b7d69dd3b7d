//! # TraceMill
//!
//! Turns printed circuit board drawings into milling programs:
//! - Gerber copper layers become isolation routing around every trace
//! - Excellon drill files become grouped drilling cycles
//! - Board outlines become cut-through edge routing
//!
//! ## Architecture
//!
//! TraceMill is organized as a workspace with multiple crates:
//!
//! 1. **tracemill-core** - Tasks, units, polygons and the plot primitive tree
//! 2. **tracemill-camtools** - Drawing plotters, geometry kernel, offsets and G-code
//! 3. **tracemill-settings** - Configuration files and per-kind defaults
//! 4. **tracemill-pipeline** - Cached, cancellable batch orchestration
//! 5. **tracemill** - Command line binary that integrates all crates

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use tracemill_camtools as camtools;
pub use tracemill_core::{Flip, Task, TaskKind, Units};
pub use tracemill_pipeline::{BatchResult, Pipeline, PipelineConfig};
pub use tracemill_settings::TraceMillConfig;

use tracemill_camtools::{generate_program, DrawingPlotter};

/// Initialize logging
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support, defaulting to `info` (`debug` when verbose)
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(())
}

/// Read drawing files into tasks, identifying each layer from its file name.
pub fn load_tasks(
    paths: &[PathBuf],
    config: &TraceMillConfig,
    flip: Option<Flip>,
) -> anyhow::Result<Vec<Task>> {
    paths
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read drawing {:?}", path))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .with_context(|| format!("Not a file: {:?}", path))?;

            let mut task = config.apply_task_defaults(Task::from_file(file_name, content));
            if let Some(flip) = flip {
                task = task.with_flip(flip);
            }
            tracing::info!(
                "{}: {} task, {} steps of {}",
                task.file_name,
                task.kind,
                task.steps,
                task.offset
            );
            Ok(task)
        })
        .collect()
}

/// Build a pipeline with the configured geometry settings.
pub fn pipeline_for(config: &TraceMillConfig) -> anyhow::Result<Pipeline> {
    let plotter = DrawingPlotter::new().context("Failed to set up drawing plotters")?;
    Ok(Pipeline::new(
        Arc::new(plotter),
        PipelineConfig {
            scale: config.scale,
            minimum_radius: config.minimum_radius,
            svg_scale: config.svg_scale,
        },
    ))
}

/// Write one `<file stem>.nc` program per millable task, in machining order.
///
/// Returns the written paths.
pub fn write_programs(
    result: &BatchResult,
    config: &TraceMillConfig,
    output_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let mut tasks: Vec<_> = result
        .rendered_tasks
        .iter()
        .filter(|rendered| rendered.task.kind != TaskKind::Drawing)
        .collect();
    tasks.sort_by(|a, b| a.task.program_cmp(&b.task));

    let mut written = Vec::with_capacity(tasks.len());
    for rendered in tasks {
        let params = config.machining.get(rendered.task.kind)?;
        let gcode = generate_program(
            rendered,
            params,
            result.geometry_scale,
            config.render_only_paths,
        )
        .with_context(|| format!("Failed to generate G-code for {}", rendered.task.file_name))?;

        let stem = Path::new(&rendered.task.file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| rendered.task.kind.to_string());
        let path = output_dir.join(format!("{}.nc", stem));
        std::fs::write(&path, gcode).with_context(|| format!("Failed to write {:?}", path))?;

        tracing::info!("Wrote {} program to {:?}", rendered.task.kind, path);
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_tasks_identifies_layers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board-B_Cu.gbr");
        std::fs::write(&path, "{}").unwrap();

        let tasks = load_tasks(&[path], &TraceMillConfig::default(), Some(Flip::X)).unwrap();
        assert_eq!(tasks[0].file_name, "board-B_Cu.gbr");
        assert_eq!(tasks[0].kind, TaskKind::Isolation);
        assert_eq!(tasks[0].flip, Flip::X);
        assert_eq!(tasks[0].content, "{}");
    }

    #[test]
    fn test_missing_drawing_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nowhere-F_Cu.gbr");
        let err = load_tasks(&[missing], &TraceMillConfig::default(), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read drawing"));
    }

    #[test]
    fn test_write_programs_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nc");
        let result = BatchResult {
            bounds: Default::default(),
            units: Units::Millimeters,
            rendered_tasks: Vec::new(),
            timings: Vec::new(),
            geometry_scale: 1000.0,
        };

        let written = write_programs(&result, &TraceMillConfig::default(), &out).unwrap();
        assert!(written.is_empty());
        assert!(out.is_dir());
    }
}
