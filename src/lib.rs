//! Safe-route recommendation engine.
//!
//! Given a position and a road network annotated with physical attributes,
//! the engine snaps the position onto the nearest usable road, grades the
//! candidate roads for safety and returns ranked recommendations. When the
//! closest road is in poor condition it escalates to the nearest acceptable
//! alternative instead of silently routing over it.
//!
//! Every query is a pure, synchronous scan over an immutable [`RoadDataset`];
//! see [`Engine`] for the full pipeline.

pub mod alternative;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod position;
pub mod rank;
pub mod road;
pub mod search;
pub mod server;

pub use alternative::{AlternativeOutcome, resolve_alternative};
pub use config::{Config, EngineConfig, ServerConfig};
pub use dataset::{DatasetHandle, LoadReport, RoadDataset, SkippedFeature};
pub use engine::{Engine, NearestRoad, Recommendation, directions_url};
pub use error::Error;
pub use geometry::{Metric, Projection, project_onto_polyline};
pub use position::{DevicePosition, FixedPosition, Position, PositionSource};
pub use rank::{RouteCandidate, SafetyLevel, rank};
pub use road::{Condition, RoadAttributes, RoadSegment, surface_label};
pub use search::{SnapResult, find_nearest, find_top_k};

/// Walking pace assumed for travel-time estimates, in km/h.
pub const DEFAULT_WALKING_SPEED_KMH: f64 = 5.0;

/// Number of recommendations returned when nothing else is configured.
pub const DEFAULT_TOP_K: usize = 3;
