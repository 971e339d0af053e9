use serde::Serialize;
use tracing::{debug, info};

use crate::geometry::Metric;
use crate::search::find_nearest;
use crate::{Condition, Position, RoadDataset, SnapResult};

/// Result of escalating away from a poor nearest road.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "road", rename_all = "snake_case")]
pub enum AlternativeOutcome<'a> {
    /// The nearest road is acceptable, or there is no nearest road at all.
    NotNeeded,
    /// Closest road that is not in poor condition.
    Found(SnapResult<'a>),
    /// Every road is poor; nothing acceptable to offer.
    Unavailable,
}

impl<'a> AlternativeOutcome<'a> {
    pub fn road(&self) -> Option<&SnapResult<'a>> {
        match self {
            AlternativeOutcome::Found(snap) => Some(snap),
            _ => None,
        }
    }
}

fn is_poor(condition: Condition) -> bool {
    condition == Condition::Poor
}

/// Second phase of the nearest-road policy.
///
/// `nearest` is the unconditional nearest road for `position`. Only when it is
/// in poor condition is the dataset searched again with poor roads excluded;
/// the poor road is never offered as its own alternative.
pub fn resolve_alternative<'a>(
    position: Position,
    dataset: &'a RoadDataset,
    metric: Metric,
    nearest: Option<&SnapResult<'a>>,
) -> AlternativeOutcome<'a> {
    let Some(nearest) = nearest else {
        return AlternativeOutcome::NotNeeded;
    };
    if !is_poor(nearest.condition()) {
        return AlternativeOutcome::NotNeeded;
    }

    debug!("Nearest road #{} is in poor condition, escalating", nearest.index);
    match find_nearest(position, dataset, metric, is_poor) {
        Some(snap) => AlternativeOutcome::Found(snap),
        None => {
            info!("No alternative to poor road #{} for {position}", nearest.index);
            AlternativeOutcome::Unavailable
        }
    }
}
