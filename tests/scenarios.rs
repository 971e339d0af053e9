use approx::assert_relative_eq;
use test_log::test;

use saferoute::{
    AlternativeOutcome, Condition, Engine, EngineConfig, Metric, Position, RoadAttributes,
    RoadDataset, RoadSegment, SafetyLevel, find_nearest, find_top_k, rank, resolve_alternative,
};

fn road(points: &[[f64; 2]], condition: Condition) -> RoadSegment {
    RoadSegment::new(
        points.iter().copied().map(Position::from).collect(),
        RoadAttributes {
            condition,
            ..Default::default()
        },
    )
    .unwrap()
}

/// A = x 0, Good; B = x 1, Poor.
fn good_and_poor() -> RoadDataset {
    RoadDataset::from_segments(vec![
        road(&[[0.0, 0.0], [0.0, 10.0]], Condition::Good),
        road(&[[1.0, 0.0], [1.0, 10.0]], Condition::Poor),
    ])
}

#[test]
fn distance_dominates_without_exclusion() {
    let dataset = good_and_poor();
    let nearest = find_nearest(Position::new(0.5, 5.0), &dataset, Metric::Euclidean, |_| false).unwrap();

    assert_eq!(nearest.index, 0);
    assert_eq!(nearest.condition(), Condition::Good);
    assert_relative_eq!(nearest.distance, 0.5, epsilon = 1e-9);
}

#[test]
fn poor_nearest_escalates_to_acceptable_road() {
    let dataset = good_and_poor();
    let position = Position::new(0.9, 5.0);

    let nearest = find_nearest(position, &dataset, Metric::Euclidean, |_| false).unwrap();
    assert_eq!(nearest.index, 1);
    assert_relative_eq!(nearest.distance, 0.1, epsilon = 1e-9);

    let outcome = resolve_alternative(position, &dataset, Metric::Euclidean, Some(&nearest));
    let alternative = outcome.road().unwrap();
    assert_eq!(alternative.index, 0);
    assert_eq!(alternative.position, Position::new(0.0, 5.0));
    assert_relative_eq!(alternative.distance, 0.9, epsilon = 1e-9);
}

#[test]
fn all_poor_reports_no_alternative() {
    let dataset = RoadDataset::from_segments(vec![
        road(&[[0.0, 0.0], [0.0, 10.0]], Condition::Poor),
        road(&[[1.0, 0.0], [1.0, 10.0]], Condition::Poor),
    ]);
    let engine = Engine::new(EngineConfig {
        metric: Metric::Euclidean,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(
        engine.alternative_road(Position::new(0.3, 5.0), &dataset),
        AlternativeOutcome::Unavailable
    );
}

#[test]
fn rerank_is_stable() {
    let dataset = RoadDataset::from_segments(vec![
        road(&[[0.0, 0.0], [0.0, 10.0]], Condition::VeryGood),
        road(&[[2.0, 0.0], [2.0, 10.0]], Condition::Fair),
        road(&[[-2.0, 0.0], [-2.0, 10.0]], Condition::Unknown),
    ]);
    let top = find_top_k(Position::new(1.0, 5.0), &dataset, Metric::Euclidean, |_| false, 3);

    let first = rank(&top, 5.0);
    let second = rank(&top, 5.0);
    assert_eq!(first, second);

    // Equal distances to x=0 and x=2 keep dataset order.
    let safety: Vec<SafetyLevel> = first.iter().map(|r| r.safety).collect();
    assert_eq!(safety, vec![SafetyLevel::VeryHigh, SafetyLevel::Medium, SafetyLevel::Low]);
}

#[test]
fn geographic_dataset_end_to_end() {
    let raw = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/roads.geojson")).unwrap();
    let (dataset, report) = RoadDataset::from_geojson_str(&raw).unwrap();
    assert_eq!(report.accepted, 4);
    assert_eq!(report.skipped.len(), 1);

    let engine = Engine::default();
    let origin = Position::new(3.3792, 9.5244);
    let rec = engine.recommend(origin, &dataset);

    // The debug location sits next to F101, which is in poor condition.
    let nearest = rec.nearest.as_ref().unwrap();
    assert_eq!(nearest.snap.segment.attributes().road_id.as_deref(), Some("F101"));
    assert!(nearest.poor_condition);
    assert!(nearest.snap.distance < 50.0);

    let alternative = rec.alternative.road().unwrap();
    assert_eq!(alternative.segment.attributes().road_id.as_deref(), Some("A123"));
    assert_relative_eq!(alternative.position.lat, 9.53, epsilon = 1e-9);
    assert_relative_eq!(alternative.distance, 622.7, epsilon = 2.0);

    assert_eq!(rec.routes.len(), 3);
    assert_eq!(rec.routes[0].name, "Route via F101");
    assert_eq!(rec.routes[1].name, "Route via A123");
    assert!(rec.routes.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));
    assert_eq!(rec.routes[1].time_min, 7);
}
