//! Excellon drill reader
//!
//! Understands the subset of Excellon written by common PCB tools: unit and
//! format headers, `TnCd` tool definitions, tool selection and `X..Y..` hits.
//! Every hit becomes a circle of the selected tool's diameter.

use crate::error::{CamToolResult, FileFormatError};
use regex::Regex;
use std::collections::HashMap;
use tracemill_core::{PlotNode, PlotTree, Shape, Units};
use tracing::{debug, warn};

/// How coordinates without a decimal point are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZeroSuppression {
    /// Leading zeros kept, trailing zeros dropped
    Trailing,
    /// Trailing zeros kept, leading zeros dropped
    Leading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberFormat {
    integer: usize,
    decimal: usize,
    suppression: ZeroSuppression,
}

impl NumberFormat {
    fn for_units(units: Units, suppression: ZeroSuppression) -> Self {
        match units {
            Units::Millimeters => Self {
                integer: 3,
                decimal: 3,
                suppression,
            },
            Units::Inches => Self {
                integer: 2,
                decimal: 4,
                suppression,
            },
        }
    }

    fn parse(&self, text: &str) -> Option<f64> {
        if text.contains('.') {
            return text.parse().ok();
        }

        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, text.strip_prefix('+').unwrap_or(text)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let value: f64 = match self.suppression {
            ZeroSuppression::Leading => digits.parse().ok()?,
            ZeroSuppression::Trailing => {
                let width = self.integer + self.decimal;
                format!("{:0<width$}", digits, width = width).parse().ok()?
            }
        };
        Some(sign * value / 10f64.powi(self.decimal as i32))
    }
}

/// Plots Excellon drill files
#[derive(Debug, Clone)]
pub struct ExcellonReader {
    tool_definition: Regex,
    tool_select: Regex,
    hit: Regex,
    format_comment: Regex,
}

impl ExcellonReader {
    pub fn new() -> CamToolResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| FileFormatError::ExcellonParseError(e.to_string()))
        };
        Ok(Self {
            tool_definition: compile(r"^T(\d+)(?:[FS][\d.]+)*C([\d.]+)")?,
            tool_select: compile(r"^T(\d+)$")?,
            hit: compile(r"^(?:G0?5)?(?:X([-+]?[\d.]+))?(?:Y([-+]?[\d.]+))?$")?,
            format_comment: compile(r"FORMAT=\{-?(\d+):-?(\d+)")?,
        })
    }

    /// True if the text looks like an Excellon drill file.
    pub fn detect(content: &str) -> bool {
        content
            .lines()
            .map(str::trim)
            .any(|line| line == "M48" || line.starts_with(";DRILL") || line.starts_with("; DRILL"))
    }

    pub fn plot(&self, content: &str) -> CamToolResult<PlotTree> {
        if content.trim().is_empty() {
            return Err(FileFormatError::EmptyFile("excellon document".to_string()).into());
        }

        let mut units = Units::Millimeters;
        let mut suppression = ZeroSuppression::Leading;
        let mut explicit_format: Option<(usize, usize)> = None;
        let mut tools: HashMap<u32, f64> = HashMap::new();
        let mut current_tool: Option<u32> = None;
        let mut position = [0.0, 0.0];
        let mut hits: Vec<[f64; 3]> = Vec::new();

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.format_comment.captures(line) {
                let integer = caps[1].parse().unwrap_or(3);
                let decimal = caps[2].parse().unwrap_or(3);
                explicit_format = Some((integer, decimal));
                continue;
            }
            if line.starts_with(';') {
                continue;
            }

            if line.starts_with("METRIC") || line == "M71" {
                units = Units::Millimeters;
            } else if line.starts_with("INCH") || line == "M72" {
                units = Units::Inches;
            }
            if line.contains(",LZ") {
                suppression = ZeroSuppression::Trailing;
            } else if line.contains(",TZ") {
                suppression = ZeroSuppression::Leading;
            }
            if line.starts_with("METRIC") || line.starts_with("INCH") || line.starts_with('M') {
                continue;
            }

            if let Some(caps) = self.tool_definition.captures(line) {
                let (Ok(tool), Ok(diameter)) = (caps[1].parse::<u32>(), caps[2].parse::<f64>())
                else {
                    warn!("Skipping malformed tool definition: {}", line);
                    continue;
                };
                tools.insert(tool, diameter);
                continue;
            }

            if let Some(caps) = self.tool_select.captures(line) {
                current_tool = caps[1].parse().ok();
                continue;
            }

            if line.contains("G85") {
                warn!("Skipping slot: {}", line);
                continue;
            }

            if let Some(caps) = self.hit.captures(line) {
                if caps.get(1).is_none() && caps.get(2).is_none() {
                    continue;
                }
                let format = match explicit_format {
                    Some((integer, decimal)) => NumberFormat {
                        integer,
                        decimal,
                        suppression,
                    },
                    None => NumberFormat::for_units(units, suppression),
                };
                let mut parse_axis = |index: usize, axis: usize| -> CamToolResult<()> {
                    if let Some(m) = caps.get(index) {
                        position[axis] = format.parse(m.as_str()).ok_or_else(|| {
                            FileFormatError::ExcellonParseError(format!(
                                "invalid coordinate '{}'",
                                m.as_str()
                            ))
                        })?;
                    }
                    Ok(())
                };
                parse_axis(1, 0)?;
                parse_axis(2, 1)?;

                match current_tool.and_then(|t| tools.get(&t)) {
                    Some(&diameter) => hits.push([position[0], position[1], diameter]),
                    None => warn!("Drill hit without a defined tool: {}", line),
                }
                continue;
            }

            debug!("Ignoring excellon line: {}", line);
        }

        let mut tree = PlotTree::new(units);
        for [cx, cy, diameter] in hits {
            tree.push(PlotNode::Shape {
                shape: Shape::Circle {
                    cx,
                    cy,
                    r: diameter / 2.0,
                },
            });
        }
        debug!("Read {} drill hits from {} tools", tree.children.len(), tools.len());
        Ok(tree)
    }
}
