use itertools::Itertools;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::geometry::{Metric, project_onto_polyline};
use crate::{Condition, Position, RoadAttributes, RoadDataset, RoadSegment};

/// A position snapped onto one road of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapResult<'a> {
    /// The closest point on the road's centerline.
    pub position: Position,
    /// Meters between the query position and [`SnapResult::position`].
    pub distance: f64,
    /// Index of the road in dataset order.
    pub index: usize,
    #[serde(rename = "road", serialize_with = "road_attributes")]
    pub segment: &'a RoadSegment,
}

fn road_attributes<S: Serializer>(segment: &&RoadSegment, serializer: S) -> Result<S::Ok, S::Error> {
    RoadAttributes::serialize(segment.attributes(), serializer)
}

impl SnapResult<'_> {
    pub fn condition(&self) -> Condition {
        self.segment.condition()
    }
}

/// Snaps `position` onto every road whose condition `exclude` lets through,
/// in dataset order.
fn snaps<'a, F>(
    position: Position,
    dataset: &'a RoadDataset,
    metric: Metric,
    exclude: F,
) -> impl Iterator<Item = SnapResult<'a>>
where
    F: Fn(Condition) -> bool,
{
    dataset
        .iter()
        .enumerate()
        .filter(move |(_, segment)| !exclude(segment.condition()))
        .filter_map(move |(index, segment)| {
            // `RoadSegment::new` guarantees two vertices.
            let projection = project_onto_polyline(position, segment.geometry(), metric).ok()?;
            Some(SnapResult {
                position: projection.point,
                distance: projection.distance,
                index,
                segment,
            })
        })
}

/// The closest road not rejected by `exclude`. Equal distances resolve to the
/// road that comes first in the dataset.
///
/// `None` is the ordinary answer for an empty dataset or when every road is
/// excluded.
pub fn find_nearest<'a, F>(
    position: Position,
    dataset: &'a RoadDataset,
    metric: Metric,
    exclude: F,
) -> Option<SnapResult<'a>>
where
    F: Fn(Condition) -> bool,
{
    let nearest = snaps(position, dataset, metric, exclude)
        .min_by(|a, b| a.distance.total_cmp(&b.distance));

    match &nearest {
        Some(snap) => debug!(
            "Nearest road to {position}: #{} at {:.1} m ({})",
            snap.index,
            snap.distance,
            snap.condition()
        ),
        None => debug!("No candidate road for {position} among {} segments", dataset.count()),
    }
    nearest
}

/// Up to `k` closest roads not rejected by `exclude`, ascending by distance
/// with dataset order breaking ties.
pub fn find_top_k<'a, F>(
    position: Position,
    dataset: &'a RoadDataset,
    metric: Metric,
    exclude: F,
    k: usize,
) -> Vec<SnapResult<'a>>
where
    F: Fn(Condition) -> bool,
{
    snaps(position, dataset, metric, exclude)
        .sorted_by(|a, b| a.distance.total_cmp(&b.distance))
        .take(k)
        .collect()
}
