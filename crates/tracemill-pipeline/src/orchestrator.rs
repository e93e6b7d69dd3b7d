//! Batch orchestration
//!
//! [`Pipeline::run`] takes every task of a board, plots and merges each
//! drawing, offsets the merged geometry into tool rings and renders preview
//! paths. Whole batches and individual ring sequences are memoised by
//! fingerprint, so repeating a request (or changing only one task) skips the
//! unchanged work. View flags (`flip`, `hide_areas`, `hide_paths`) are not part
//! of the batch fingerprint; they are applied to the cached result on the way
//! out.

use crate::cache::{CacheStore, LruStore, DEFAULT_BATCH_CAPACITY, DEFAULT_RING_CAPACITY};
use crate::cancel::{CancellationToken, Generation};
use crate::error::{PipelineError, PipelineResult};
use crate::progress::{ProgressTracker, TICKS_PER_TASK};
use crate::stage::PipelineStage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracemill_camtools::{
    OffsetRequest, Plotter, RenderedTask, SvgPathType, SvgRenderer, Transformer,
    DEFAULT_MINIMUM_RADIUS, DEFAULT_SCALE, DEFAULT_SVG_SCALE, PRECISION,
};
use tracemill_core::{
    Bounds, DrillHole, Fingerprint, Flip, Polygon, PolygonSet, ProgressCallback, Task, TaskKind,
    Units,
};
use tracing::{debug, info, warn};

/// Geometry settings shared by every task of a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Integer grid resolution per drawing unit, before the fixed precision factor
    pub scale: f64,
    pub minimum_radius: f64,
    /// Display units per drawing unit for preview paths
    pub svg_scale: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            minimum_radius: DEFAULT_MINIMUM_RADIUS,
            svg_scale: DEFAULT_SVG_SCALE,
        }
    }
}

/// Output of one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Board outline bounds, or the union of all task bounds without an outline
    pub bounds: Bounds,
    pub units: Units,
    pub rendered_tasks: Vec<RenderedTask>,
    pub timings: Vec<String>,
    /// Integer units per drawing unit of every polygon in `rendered_tasks`
    pub geometry_scale: f64,
}

impl BatchResult {
    fn empty(geometry_scale: f64) -> Self {
        Self {
            bounds: Bounds::default(),
            units: Units::Millimeters,
            rendered_tasks: Vec::new(),
            timings: vec!["No tasks, nothing to do.".to_string()],
            geometry_scale,
        }
    }

    /// Re-attach the requested tasks and drop the preview paths they hide.
    fn with_view(mut self, tasks: &[Task]) -> Self {
        for (rendered, task) in self.rendered_tasks.iter_mut().zip(tasks) {
            rendered.task = task.clone();
            rendered.svg_path_props.retain(|props| match props.path_type {
                SvgPathType::Area => !task.hide_areas,
                SvgPathType::Outline => !task.hide_paths,
            });
        }
        self
    }
}

/// `task` with the view-only flags reset
fn geometry_task(task: &Task) -> Task {
    Task {
        flip: Flip::None,
        hide_areas: false,
        hide_paths: false,
        ..task.clone()
    }
}

#[derive(Serialize)]
struct BatchKey<'a> {
    tasks: &'a [Task],
    scale: f64,
    minimum_radius: f64,
    svg_scale: f64,
}

/// A task after plotting and merging
struct MergedTask {
    task: Task,
    units: Units,
    polygons: PolygonSet,
    drills: Vec<DrillHole>,
}

pub struct Pipeline {
    plotter: Arc<dyn Plotter>,
    config: PipelineConfig,
    batch_cache: Arc<dyn CacheStore<BatchResult>>,
    ring_cache: Arc<dyn CacheStore<Vec<PolygonSet>>>,
    generation: Generation,
    stage: Mutex<PipelineStage>,
    progress: ProgressTracker,
}

impl Pipeline {
    pub fn new(plotter: Arc<dyn Plotter>, config: PipelineConfig) -> Self {
        Self {
            plotter,
            config,
            batch_cache: Arc::new(LruStore::<BatchResult>::new(DEFAULT_BATCH_CAPACITY)),
            ring_cache: Arc::new(LruStore::<Vec<PolygonSet>>::new(DEFAULT_RING_CAPACITY)),
            generation: Generation::new(),
            stage: Mutex::new(PipelineStage::Idle),
            progress: ProgressTracker::new(),
        }
    }

    /// Replace the default caches, e.g. to share them between pipelines.
    pub fn with_caches(
        mut self,
        batch_cache: Arc<dyn CacheStore<BatchResult>>,
        ring_cache: Arc<dyn CacheStore<Vec<PolygonSet>>>,
    ) -> Self {
        self.batch_cache = batch_cache;
        self.ring_cache = ring_cache;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = ProgressTracker::with_callback(callback);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stage(&self) -> PipelineStage {
        *self.stage.lock()
    }

    pub fn progress(&self) -> f64 {
        self.progress.fraction()
    }

    /// Integer units per drawing unit of the produced geometry.
    pub fn geometry_scale(&self) -> f64 {
        self.config.scale * PRECISION
    }

    /// Issue a token for a new run; every earlier run becomes stale.
    pub fn begin(&self) -> CancellationToken {
        self.generation.begin()
    }

    /// Run a batch, superseding any run still in flight.
    pub async fn run(&self, tasks: &[Task]) -> PipelineResult<BatchResult> {
        let token = self.begin();
        self.run_with_token(tasks, &token).await
    }

    /// Run a batch under an explicitly issued token.
    pub async fn run_with_token(
        &self,
        tasks: &[Task],
        token: &CancellationToken,
    ) -> PipelineResult<BatchResult> {
        token.check()?;
        self.progress.reset();

        if tasks.is_empty() {
            tokio::task::yield_now().await;
            token.check()?;
            self.progress.finish();
            self.set_stage(PipelineStage::Done);
            return Ok(BatchResult::empty(self.geometry_scale()));
        }

        let geometry_tasks: Vec<Task> = tasks.iter().map(geometry_task).collect();
        let key = Fingerprint::of(&BatchKey {
            tasks: &geometry_tasks,
            scale: self.config.scale,
            minimum_radius: self.config.minimum_radius,
            svg_scale: self.config.svg_scale,
        })?;

        if let Some(cached) = self.batch_cache.get(&key) {
            tokio::task::yield_now().await;
            token.check()?;
            info!("Batch {} served from cache", key);
            self.progress.finish();
            self.set_stage(PipelineStage::Done);
            return Ok(cached.with_view(tasks));
        }

        match self.compute(&geometry_tasks, token).await {
            Ok(result) => {
                token.check()?;
                self.batch_cache.insert(key, result.clone());
                self.progress.finish();
                self.set_stage(PipelineStage::Done);
                Ok(result.with_view(tasks))
            }
            Err(PipelineError::Superseded) => {
                debug!("Run {} superseded", token.id());
                Err(PipelineError::Superseded)
            }
            Err(err) => {
                if !token.is_superseded() {
                    warn!("Batch failed: {}", err);
                    self.progress.finish();
                    self.set_stage(PipelineStage::Error);
                }
                Err(err)
            }
        }
    }

    async fn compute(
        &self,
        tasks: &[Task],
        token: &CancellationToken,
    ) -> PipelineResult<BatchResult> {
        let mut transformer = Transformer::new(self.config.scale, self.config.minimum_radius);
        let geometry_scale = transformer.geometry_scale();

        let mut merged = Vec::with_capacity(tasks.len());
        for task in tasks {
            self.set_stage(PipelineStage::Parsing);
            let tree = self
                .plotter
                .plot(&task.file_name, &task.content, task.kind)
                .map_err(|err| PipelineError::task(&task.file_name, err))?;

            self.set_stage(PipelineStage::Geometry);
            transformer
                .run(&tree, task.kind)
                .map_err(|err| PipelineError::task(&task.file_name, err))?;
            let polygons: PolygonSet = transformer
                .result(task.kind)
                .map_err(|err| PipelineError::task(&task.file_name, err))?
                .into_iter()
                .map(Polygon::closed)
                .collect();
            debug!("{}: {} polygons", task.file_name, polygons.len());

            merged.push(MergedTask {
                task: task.clone(),
                units: tree.units,
                polygons,
                drills: transformer.drill_holes().to_vec(),
            });
        }

        self.progress.add_estimate(TICKS_PER_TASK * merged.len() as u64);
        self.tick(token).await?;

        let board = merged
            .iter()
            .find(|m| m.task.kind == TaskKind::EdgeCut)
            .map(|m| m.polygons.clone());
        let bounds = match &board {
            Some(board) => Bounds::of(board),
            None => merged
                .iter()
                .filter_map(|m| Bounds::of(&m.polygons))
                .reduce(Bounds::union),
        }
        .unwrap_or_default();
        let units = Units::reconcile(merged.iter().map(|m| m.units));
        self.tick(token).await?;

        let renderer = SvgRenderer::new(self.config.svg_scale, geometry_scale);
        let mut timings = Vec::new();
        let mut rendered_tasks = Vec::with_capacity(merged.len());
        for task in merged {
            let rendered = self
                .render_task(task, board.as_deref(), &renderer, geometry_scale, &mut timings, token)
                .await?;
            rendered_tasks.push(rendered);
        }
        self.tick(token).await?;

        Ok(BatchResult {
            bounds,
            units,
            rendered_tasks,
            timings,
            geometry_scale,
        })
    }

    async fn render_task(
        &self,
        merged: MergedTask,
        board: Option<&[Polygon]>,
        renderer: &SvgRenderer,
        geometry_scale: f64,
        timings: &mut Vec<String>,
        token: &CancellationToken,
    ) -> PipelineResult<RenderedTask> {
        let MergedTask {
            task,
            polygons,
            drills,
            ..
        } = merged;

        self.set_stage(PipelineStage::Rendering);
        let start = Instant::now();
        let mut svg_path_props = vec![renderer.area_props(&task, &polygons)];
        let areas_ms = elapsed_ms(start);
        self.tick(token).await?;

        self.set_stage(PipelineStage::Offsetting);
        let start = Instant::now();
        let request = OffsetRequest {
            steps: task.steps,
            distance: task.offset,
            polygons: &polygons,
            kind: task.kind,
            board,
            scale: geometry_scale,
        };
        let offset_paths = self.offset_rings(&task, &request, token).await?;
        self.tick(token).await?;
        let offsets_ms = elapsed_ms(start);

        self.set_stage(PipelineStage::Rendering);
        let start = Instant::now();
        svg_path_props.extend(renderer.outline_props(&task, &offset_paths, &drills));
        self.tick(token).await?;
        let outlines_ms = elapsed_ms(start);

        timings.push(format!(
            "Rendering {} polygons to paths took total {:.2}ms:",
            task.kind,
            areas_ms + offsets_ms + outlines_ms
        ));
        timings.push(format!("  Polygons to Path: {:.2}ms", areas_ms));
        timings.push(format!(
            "  Clipper Offsets ({} steps): {:.2}ms",
            task.steps, offsets_ms
        ));
        timings.push(format!("  Paths Offset SVG Paths: {:.2}ms", outlines_ms));

        Ok(RenderedTask {
            task,
            polygons,
            drills,
            offset_paths,
            svg_path_props,
        })
    }

    async fn offset_rings(
        &self,
        task: &Task,
        request: &OffsetRequest<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<Vec<PolygonSet>> {
        let key = Fingerprint::of(request)?;
        if let Some(rings) = self.ring_cache.get(&key) {
            debug!("{}: offset rings served from cache", task.file_name);
            return Ok(rings);
        }

        self.progress.add_estimate(u64::from(request.ring_count()));
        let mut rings = Vec::with_capacity(request.ring_count() as usize);
        for ring in request.rings() {
            rings.push(ring.map_err(|err| PipelineError::task(&task.file_name, err))?);
            self.tick(token).await?;
        }

        self.ring_cache.insert(key, rings.clone());
        Ok(rings)
    }

    async fn tick(&self, token: &CancellationToken) -> PipelineResult<()> {
        token.check()?;
        self.progress.tick().await;
        token.check()
    }

    fn set_stage(&self, stage: PipelineStage) {
        let mut current = self.stage.lock();
        if *current != stage {
            debug!("Pipeline stage {} -> {}", *current, stage);
            *current = stage;
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
