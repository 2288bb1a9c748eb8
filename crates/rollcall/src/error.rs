use rollcall_core::EngineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no face found on the image")]
    NoFaceFound,
    #[error("expected a single face on the image, found {0}")]
    AmbiguousFace(usize),
    #[error("face does not match any known sample")]
    NoMatch,
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("dataset encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid font: {0}")]
    Font(String),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("engine failed to initialize: {0}")]
    EngineInit(#[source] EngineError),
}

pub type Result<T> = std::result::Result<T, Error>;
