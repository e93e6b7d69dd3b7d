//! Plotter boundary
//!
//! A [`Plotter`] turns a drawing file's text into a [`PlotTree`]. The pipeline
//! only talks to this trait so callers can swap in their own parsers.

use crate::error::CamToolResult;
use crate::excellon::ExcellonReader;
use crate::gerber::GerberPlotter;
use tracemill_core::{PlotTree, TaskKind};
use tracing::debug;

/// Converts drawing text into plot primitives
pub trait Plotter: Send + Sync {
    fn plot(&self, file_name: &str, content: &str, kind: TaskKind) -> CamToolResult<PlotTree>;
}

/// Picks a reader from the content: serialized plot trees, Excellon drill
/// files, and Gerber for everything else.
#[derive(Debug, Clone)]
pub struct DrawingPlotter {
    gerber: GerberPlotter,
    excellon: ExcellonReader,
}

impl DrawingPlotter {
    pub fn new() -> CamToolResult<Self> {
        Ok(Self {
            gerber: GerberPlotter::new(),
            excellon: ExcellonReader::new()?,
        })
    }
}

impl Plotter for DrawingPlotter {
    fn plot(&self, file_name: &str, content: &str, kind: TaskKind) -> CamToolResult<PlotTree> {
        if content.trim_start().starts_with('{') {
            debug!("Reading {} as a plot tree", file_name);
            return Ok(PlotTree::from_json(content)?);
        }
        if kind == TaskKind::Drill && ExcellonReader::detect(content) {
            debug!("Reading {} as an excellon drill file", file_name);
            return self.excellon.plot(content);
        }
        debug!("Reading {} as a gerber layer", file_name);
        self.gerber.plot(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracemill_core::{PlotNode, Shape, Units};

    #[test]
    fn test_plot_tree_passthrough() {
        let mut tree = PlotTree::new(Units::Inches);
        tree.push(PlotNode::Shape {
            shape: Shape::Circle {
                cx: 1.0,
                cy: 2.0,
                r: 0.5,
            },
        });
        let json = tree.to_json().unwrap();

        let plotter = DrawingPlotter::new().unwrap();
        let plotted = plotter.plot("board.json", &json, TaskKind::Isolation).unwrap();
        assert_eq!(plotted, tree);
    }

    #[test]
    fn test_excellon_dispatch() {
        let content = "M48\nMETRIC\nT1C1.0\n%\nT1\nX1.0Y1.0\nM30\n";
        let plotter = DrawingPlotter::new().unwrap();
        let tree = plotter.plot("board.drl", content, TaskKind::Drill).unwrap();
        assert_eq!(tree.children.len(), 1);
    }
}
