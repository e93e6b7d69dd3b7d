//! Open polyline stitching
//!
//! Outline layers arrive as thousands of disconnected strokes. Stitching joins them
//! end to end into as few loops as possible.

use std::collections::VecDeque;
use tracemill_core::{same_point, PointF, Polyline};

fn is_closed(path: &[PointF], epsilon: f64) -> bool {
    match (path.first(), path.last()) {
        (Some(&first), Some(&last)) => path.len() > 2 && same_point(first, last, epsilon),
        _ => false,
    }
}

/// Join polylines that share endpoints (within `epsilon`) into loops.
///
/// Paths are taken from the pool in input order. The current path is extended by
/// the first pool entry that connects, trying end to start, end to end, start to
/// end and start to start on each entry. A path whose ends meet is finished; a path
/// with no remaining match is finished open.
pub fn stitch_polylines(polylines: Vec<Polyline>, epsilon: f64) -> Vec<Polyline> {
    let mut pool: VecDeque<Polyline> = polylines.into_iter().filter(|p| !p.is_empty()).collect();
    let mut result = Vec::new();

    while let Some(mut current) = pool.pop_front() {
        while !is_closed(&current, epsilon) {
            let (Some(&head), Some(&tail)) = (current.first(), current.last()) else {
                break;
            };

            let found = pool.iter().enumerate().find_map(|(index, segment)| {
                let first = *segment.first()?;
                let last = *segment.last()?;
                if same_point(tail, first, epsilon) {
                    Some((index, Join::EndToStart))
                } else if same_point(tail, last, epsilon) {
                    Some((index, Join::EndToEnd))
                } else if same_point(head, last, epsilon) {
                    Some((index, Join::StartToEnd))
                } else if same_point(head, first, epsilon) {
                    Some((index, Join::StartToStart))
                } else {
                    None
                }
            });

            let Some((index, join)) = found else {
                break;
            };
            let Some(segment) = pool.remove(index) else {
                break;
            };

            match join {
                Join::EndToStart => current.extend(segment.into_iter().skip(1)),
                Join::EndToEnd => current.extend(segment.into_iter().rev().skip(1)),
                Join::StartToEnd => {
                    let mut joined = segment;
                    joined.pop();
                    joined.extend(current);
                    current = joined;
                }
                Join::StartToStart => {
                    let mut joined: Polyline = segment.into_iter().skip(1).rev().collect();
                    joined.extend(current);
                    current = joined;
                }
            }
        }

        if !is_closed(&current, epsilon) {
            tracing::debug!(
                "Outline path with {} points could not be closed",
                current.len()
            );
        }
        result.push(current);
    }

    result
}

#[derive(Debug, Clone, Copy)]
enum Join {
    EndToStart,
    EndToEnd,
    StartToEnd,
    StartToStart,
}
