//! Gerber plotter
//!
//! Reads RS-274X copper and outline layers with `gerber_parser` and turns the
//! command stream into a [`PlotTree`]: flashes become shapes, draws become
//! stroked paths and G36/G37 blocks become regions. Coordinates stay in the
//! file's own units.

use crate::error::{CamToolResult, FileFormatError};
use gerber_parser::parse;
use gerber_types::{
    Aperture, Command, CoordinateNumber, Coordinates, DCode, FunctionCode, GCode,
    InterpolationMode, Operation, QuadrantMode, Unit,
};
use regex::Regex;
use std::f64::consts::TAU;
use std::io::BufReader;
use tracemill_core::{PathSegment, PlotNode, PlotTree, Shape, Units};
use tracing::{debug, warn};

/// Stroke width for draws whose aperture is missing or has no usable size.
const FALLBACK_APERTURE_WIDTH: f64 = 0.1;

/// Some exporters repeat the format and unit headers, which the parser rejects.
fn sanitize(content: &str) -> CamToolResult<String> {
    let mut sanitized = content.to_string();
    for pattern in [r"%FS.*?\*%", r"%MO.*?\*%"] {
        let re = Regex::new(pattern)
            .map_err(|e| FileFormatError::GerberParseError(e.to_string()))?;
        let mut count = 0;
        sanitized = re
            .replace_all(&sanitized, |caps: &regex::Captures| {
                count += 1;
                if count > 1 {
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .to_string();
    }
    Ok(sanitized)
}

fn coordinate(value: Option<CoordinateNumber>, fallback: f64) -> f64 {
    value.map(f64::from).unwrap_or(fallback)
}

fn position(coords: Option<&Coordinates>, current: [f64; 2]) -> [f64; 2] {
    match coords {
        Some(c) => [coordinate(c.x, current[0]), coordinate(c.y, current[1])],
        None => current,
    }
}

/// Arc from `start` to `end` around `center`, with angles in sweep order.
fn arc_segment(start: [f64; 2], end: [f64; 2], center: [f64; 2], clockwise: bool) -> PathSegment {
    let radius = (start[0] - center[0]).hypot(start[1] - center[1]);
    let start_angle = (start[1] - center[1]).atan2(start[0] - center[0]);
    let mut end_angle = (end[1] - center[1]).atan2(end[0] - center[0]);

    if clockwise && end_angle >= start_angle {
        end_angle -= TAU;
    } else if !clockwise && end_angle <= start_angle {
        end_angle += TAU;
    }

    PathSegment::Arc {
        start: [start[0], start[1], start_angle],
        end: [end[0], end[1], end_angle],
        center,
        radius,
    }
}

fn stroke_width(aperture: Option<&Aperture>) -> f64 {
    match aperture {
        Some(Aperture::Circle(c)) => c.diameter,
        Some(Aperture::Rectangle(r)) => r.x.min(r.y),
        Some(Aperture::Obround(o)) => o.x.min(o.y),
        Some(Aperture::Polygon(p)) => p.diameter,
        _ => FALLBACK_APERTURE_WIDTH,
    }
}

/// The footprint of a flash at `(x, y)`.
fn flash_shape(aperture: &Aperture, x: f64, y: f64) -> Option<Shape> {
    match aperture {
        Aperture::Circle(c) => Some(Shape::Circle {
            cx: x,
            cy: y,
            r: c.diameter / 2.0,
        }),
        Aperture::Rectangle(r) => Some(Shape::Rectangle {
            x: x - r.x / 2.0,
            y: y - r.y / 2.0,
            x_size: r.x,
            y_size: r.y,
            r: None,
        }),
        Aperture::Obround(o) => Some(Shape::Rectangle {
            x: x - o.x / 2.0,
            y: y - o.y / 2.0,
            x_size: o.x,
            y_size: o.y,
            r: Some(o.x.min(o.y) / 2.0),
        }),
        Aperture::Polygon(p) => {
            let vertices = p.vertices.max(3) as usize;
            let rotation = p.rotation.unwrap_or(0.0).to_radians();
            let r = p.diameter / 2.0;
            let points = (0..vertices)
                .map(|i| {
                    let angle = rotation + TAU * i as f64 / vertices as f64;
                    [x + r * angle.cos(), y + r * angle.sin()]
                })
                .collect();
            Some(Shape::Polygon { points })
        }
        _ => None,
    }
}

/// Plots Gerber layers
#[derive(Debug, Clone, Copy, Default)]
pub struct GerberPlotter;

impl GerberPlotter {
    pub fn new() -> Self {
        Self
    }

    /// Plot a Gerber document. A document the parser only partly understands is
    /// plotted as far as it goes.
    pub fn plot(&self, content: &str) -> CamToolResult<PlotTree> {
        if content.trim().is_empty() {
            return Err(FileFormatError::EmptyFile("gerber document".to_string()).into());
        }

        let sanitized = sanitize(content)?;
        let reader = BufReader::new(sanitized.as_bytes());
        let doc = match parse(reader) {
            Ok(d) => d,
            Err((d, e)) => {
                warn!(
                    "Gerber parser returned error, attempting to use partial document. Error: {:?}",
                    e
                );
                d
            }
        };

        let units = match doc.units {
            Some(Unit::Inches) => Units::Inches,
            Some(Unit::Millimeters) => Units::Millimeters,
            None => {
                debug!("No units found, assuming millimeters");
                Units::Millimeters
            }
        };

        let mut tree = PlotTree::new(units);
        let mut current = [0.0, 0.0];
        let mut aperture_code: Option<i32> = None;
        let mut interpolation = InterpolationMode::Linear;
        let mut quadrant_mode = QuadrantMode::Multi;
        let mut region: Option<Vec<PathSegment>> = None;

        let flush_region = |tree: &mut PlotTree, segments: &mut Vec<PathSegment>| {
            if !segments.is_empty() {
                tree.push(PlotNode::Region {
                    segments: std::mem::take(segments),
                });
            }
        };

        for command in doc.commands() {
            match command {
                Command::FunctionCode(FunctionCode::DCode(dcode)) => match dcode {
                    DCode::Operation(Operation::Interpolate(coords, offset)) => {
                        let end = position(coords.as_ref(), current);
                        let segment = match interpolation {
                            InterpolationMode::Linear => PathSegment::Line {
                                start: current,
                                end,
                            },
                            InterpolationMode::ClockwiseCircular
                            | InterpolationMode::CounterclockwiseCircular => {
                                if matches!(quadrant_mode, QuadrantMode::Single) {
                                    debug!("Single quadrant arc treated as multi quadrant");
                                }
                                let (i, j) = match offset {
                                    Some(o) => (coordinate(o.x, 0.0), coordinate(o.y, 0.0)),
                                    None => (0.0, 0.0),
                                };
                                let center = [current[0] + i, current[1] + j];
                                let clockwise =
                                    matches!(interpolation, InterpolationMode::ClockwiseCircular);
                                arc_segment(current, end, center, clockwise)
                            }
                        };

                        match region.as_mut() {
                            Some(segments) => segments.push(segment),
                            None => {
                                let aperture = aperture_code.and_then(|c| doc.apertures.get(&c));
                                tree.push(PlotNode::Path {
                                    width: stroke_width(aperture),
                                    segments: vec![segment],
                                });
                            }
                        }
                        current = end;
                    }
                    DCode::Operation(Operation::Move(coords)) => {
                        if let Some(segments) = region.as_mut() {
                            flush_region(&mut tree, segments);
                        }
                        current = position(coords.as_ref(), current);
                    }
                    DCode::Operation(Operation::Flash(coords)) => {
                        current = position(coords.as_ref(), current);
                        let Some(aperture) = aperture_code.and_then(|c| doc.apertures.get(&c))
                        else {
                            warn!("Flash without a defined aperture at {:?}", current);
                            continue;
                        };
                        match flash_shape(aperture, current[0], current[1]) {
                            Some(shape) => tree.push(PlotNode::Shape { shape }),
                            None => warn!("Skipping flash of unsupported aperture"),
                        }
                    }
                    DCode::SelectAperture(code) => {
                        aperture_code = Some(*code);
                    }
                },
                Command::FunctionCode(FunctionCode::GCode(gcode)) => match gcode {
                    GCode::InterpolationMode(mode) => interpolation = *mode,
                    GCode::QuadrantMode(mode) => quadrant_mode = *mode,
                    GCode::RegionMode(true) => region = Some(Vec::new()),
                    GCode::RegionMode(false) => {
                        if let Some(mut segments) = region.take() {
                            flush_region(&mut tree, &mut segments);
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if let Some(mut segments) = region.take() {
            warn!("Unterminated region at end of file");
            flush_region(&mut tree, &mut segments);
        }

        debug!("Plotted gerber document into {} nodes", tree.children.len());
        Ok(tree)
    }
}
