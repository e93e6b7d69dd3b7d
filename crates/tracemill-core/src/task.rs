//! Tasks and layer identification
//!
//! A [`Task`] is one drawing file together with what should be done with it.
//! Kind, side and default step/offset values are derived from the file name
//! when the caller does not set them explicitly.

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// What a drawing is milled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Copper layer, routed around
    Isolation,
    /// Board outline, cut through
    #[serde(rename = "edgecut")]
    EdgeCut,
    /// Drill file
    Drill,
    /// Decorative layer (silkscreen, mask, paste), preview only
    Drawing,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Isolation,
        TaskKind::EdgeCut,
        TaskKind::Drill,
        TaskKind::Drawing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Isolation => "isolation",
            Self::EdgeCut => "edgecut",
            Self::Drill => "drill",
            Self::Drawing => "drawing",
        }
    }

    /// Number of offset rings generated when the user does not say otherwise.
    pub fn default_steps(self) -> u32 {
        match self {
            Self::EdgeCut | Self::Isolation => 1,
            Self::Drill | Self::Drawing => 0,
        }
    }

    /// Ring spacing in drawing units; half the usual cutter width.
    pub fn default_offset(self) -> f64 {
        match self {
            Self::EdgeCut => 1.5,
            Self::Isolation => 0.05,
            Self::Drill | Self::Drawing => 0.0,
        }
    }

    /// Position in the machining order: isolation, then drills, then the outline.
    pub fn program_order(self) -> u8 {
        match self {
            Self::Isolation => 1,
            Self::Drill => 2,
            Self::EdgeCut => 3,
            Self::Drawing => 4,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "isolation" => Ok(Self::Isolation),
            "edgecut" | "edge-cut" | "edge_cut" | "outline" => Ok(Self::EdgeCut),
            "drill" => Ok(Self::Drill),
            "drawing" => Ok(Self::Drawing),
            _ => Err(ParameterError::UnknownTaskKind(s.to_string())),
        }
    }
}

/// Board side a drawing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    #[default]
    Other,
}

/// Mirroring applied when emitting coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flip {
    #[default]
    None,
    X,
    Y,
    Both,
}

impl Flip {
    /// Per axis multipliers, `-1.0` for a mirrored axis.
    pub fn factors(self) -> (f64, f64) {
        match self {
            Self::None => (1.0, 1.0),
            Self::X => (-1.0, 1.0),
            Self::Y => (1.0, -1.0),
            Self::Both => (-1.0, -1.0),
        }
    }
}

impl FromStr for Flip {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "both" | "xy" => Ok(Self::Both),
            _ => Err(ParameterError::invalid("flip", format!("unknown flip '{}'", s))),
        }
    }
}

/// Layer type guessed from a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Copper,
    Outline,
    Drill,
    Silkscreen,
    Soldermask,
    Solderpaste,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerIdentity {
    pub layer_type: LayerType,
    pub side: Side,
}

// (suffix, type, side) checked against the lowercased file name in order.
// Outline and drill layers span the whole board and are milled from the bottom.
const LAYER_PATTERNS: &[(&str, LayerType, Side)] = &[
    ("-f_cu.gbr", LayerType::Copper, Side::Top),
    ("-b_cu.gbr", LayerType::Copper, Side::Bottom),
    ("-edge_cuts.gbr", LayerType::Outline, Side::Bottom),
    ("-f_silks.gbr", LayerType::Silkscreen, Side::Top),
    ("-b_silks.gbr", LayerType::Silkscreen, Side::Bottom),
    ("-f_mask.gbr", LayerType::Soldermask, Side::Top),
    ("-b_mask.gbr", LayerType::Soldermask, Side::Bottom),
    ("-f_paste.gbr", LayerType::Solderpaste, Side::Top),
    ("-b_paste.gbr", LayerType::Solderpaste, Side::Bottom),
    (".gtl", LayerType::Copper, Side::Top),
    (".gbl", LayerType::Copper, Side::Bottom),
    (".gko", LayerType::Outline, Side::Bottom),
    (".gm1", LayerType::Outline, Side::Bottom),
    (".gml", LayerType::Outline, Side::Bottom),
    (".gto", LayerType::Silkscreen, Side::Top),
    (".gbo", LayerType::Silkscreen, Side::Bottom),
    (".gts", LayerType::Soldermask, Side::Top),
    (".gbs", LayerType::Soldermask, Side::Bottom),
    (".gtp", LayerType::Solderpaste, Side::Top),
    (".gbp", LayerType::Solderpaste, Side::Bottom),
    (".drl", LayerType::Drill, Side::Bottom),
    (".xln", LayerType::Drill, Side::Bottom),
];

/// Guess the layer of a fabrication file from its name.
pub fn identify_layer(file_name: &str) -> LayerIdentity {
    let name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    for (suffix, layer_type, side) in LAYER_PATTERNS {
        if name.ends_with(suffix) {
            return LayerIdentity {
                layer_type: *layer_type,
                side: *side,
            };
        }
    }

    let layer_type = if name.contains("edge") || name.contains("outline") {
        LayerType::Outline
    } else if name.contains("drill") || name.contains("pth") {
        LayerType::Drill
    } else if name.contains("cu") || name.contains("copper") {
        LayerType::Copper
    } else {
        LayerType::Unknown
    };

    let side = match layer_type {
        LayerType::Outline | LayerType::Drill => Side::Bottom,
        _ if name.contains("top") || name.contains("f_") => Side::Top,
        _ if name.contains("bottom") || name.contains("b_") => Side::Bottom,
        _ => Side::Other,
    };

    LayerIdentity { layer_type, side }
}

/// One drawing file and how to mill it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub file_name: String,
    pub content: String,
    pub kind: TaskKind,
    pub side: Side,
    /// Number of offset rings
    pub steps: u32,
    /// Ring spacing in drawing units
    pub offset: f64,
    #[serde(default)]
    pub flip: Flip,
    #[serde(default)]
    pub hide_areas: bool,
    #[serde(default)]
    pub hide_paths: bool,
}

impl Task {
    /// A task of the given kind with the kind's default steps and offset.
    pub fn new(file_name: impl Into<String>, content: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            kind,
            side: Side::Other,
            steps: kind.default_steps(),
            offset: kind.default_offset(),
            flip: Flip::None,
            hide_areas: false,
            hide_paths: false,
        }
    }

    /// Build a task whose kind and side are identified from the file name.
    pub fn from_file(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let identity = identify_layer(&file_name);

        let (kind, side) = match identity.layer_type {
            LayerType::Copper => (TaskKind::Isolation, identity.side),
            LayerType::Drill => (TaskKind::Drill, identity.side),
            LayerType::Outline => (TaskKind::EdgeCut, identity.side),
            _ => (TaskKind::Drawing, Side::Other),
        };

        let mut task = Self::new(file_name, content, kind).with_side(side);
        task.hide_areas = identity.layer_type == LayerType::Unknown;
        task.hide_paths = side == Side::Other;
        tracing::debug!(
            "Identified {} as {:?} ({} / {:?})",
            task.file_name,
            identity.layer_type,
            kind,
            side
        );
        task
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_flip(mut self, flip: Flip) -> Self {
        self.flip = flip;
        self
    }

    /// Compare two tasks by machining order.
    pub fn program_cmp(&self, other: &Task) -> Ordering {
        self.kind.program_order().cmp(&other.kind.program_order())
    }
}
