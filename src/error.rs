use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Road geometry needs at least two vertices, got {vertices}")]
    InvalidGeometry { vertices: usize },
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
    #[error("Unable to retrieve your location")]
    LocationUnavailable,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
