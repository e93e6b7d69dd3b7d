//! Pipeline stages

use std::fmt;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineStage {
    #[default]
    Idle,
    Parsing,
    Geometry,
    Offsetting,
    Rendering,
    Done,
    Error,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::Geometry => "geometry",
            Self::Offsetting => "offsetting",
            Self::Rendering => "rendering",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}
