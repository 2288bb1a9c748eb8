//! Face engine boundary and its ONNX implementation.

use crate::detector::{DetectorError, FaceDetector};
use crate::recognizer::{FaceRecognizer, RecognizerError};
use crate::types::{Descriptor, DetectedFace, Rect, SampleIndex};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("detector error: {0}")]
    Detector(#[from] DetectorError),
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),
    #[error("{0:?} detection model is not loaded")]
    ModelUnavailable(DetectionModel),
}

/// Which detector to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionModel {
    /// Light detector, fast on CPU.
    #[default]
    Standard,
    /// Heavier CNN detector, better on small or rotated faces.
    Cnn,
}

/// Detection, description and matching, as seen by the workflow.
pub trait FaceEngine {
    /// Detect every face in the image file, ordered left to right.
    fn detect(&mut self, path: &Path, model: DetectionModel) -> Result<Vec<DetectedFace>, EngineError>;

    /// Replace the known samples. `ordinals[i]` identifies `descriptors[i]`.
    fn set_samples(&mut self, descriptors: Vec<Descriptor>, ordinals: Vec<usize>);

    /// Ordinal of the nearest known sample within `tolerance`, if any.
    fn classify_threshold(&self, descriptor: &Descriptor, tolerance: f32) -> Option<usize>;

    /// Free engine resources. Consumes the engine.
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// SCRFD detection + ArcFace descriptors + linear-scan sample matching.
pub struct OnnxEngine {
    detector: FaceDetector,
    cnn_detector: Option<FaceDetector>,
    recognizer: FaceRecognizer,
    samples: SampleIndex,
}

impl OnnxEngine {
    /// Load the models. The CNN detector is optional and skipped if its file is absent.
    pub fn load(detector_path: &str, cnn_path: &str, recognizer_path: &str) -> Result<Self, EngineError> {
        let detector = FaceDetector::load(detector_path)?;

        let cnn_detector = if Path::new(cnn_path).exists() {
            Some(FaceDetector::load(cnn_path)?)
        } else {
            tracing::info!(path = cnn_path, "CNN detector not present; only standard detection available");
            None
        };

        let recognizer = FaceRecognizer::load(recognizer_path)?;

        Ok(Self {
            detector,
            cnn_detector,
            recognizer,
            samples: SampleIndex::default(),
        })
    }
}

impl FaceEngine for OnnxEngine {
    fn detect(&mut self, path: &Path, model: DetectionModel) -> Result<Vec<DetectedFace>, EngineError> {
        let image = image::open(path)?.to_luma8();

        let detector = match model {
            DetectionModel::Standard => &mut self.detector,
            DetectionModel::Cnn => self
                .cnn_detector
                .as_mut()
                .ok_or(EngineError::ModelUnavailable(model))?,
        };
        let boxes = detector.detect(&image)?;

        let mut faces = boxes
            .iter()
            .map(|b| {
                Ok(DetectedFace {
                    rect: Rect::from(b),
                    descriptor: self.recognizer.extract(&image, b)?,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;
        faces.sort_by_key(|f| (f.rect.x, f.rect.y));

        tracing::debug!(path = %path.display(), ?model, faces = faces.len(), "detect");
        Ok(faces)
    }

    fn set_samples(&mut self, descriptors: Vec<Descriptor>, ordinals: Vec<usize>) {
        self.samples = SampleIndex::new(descriptors, ordinals);
        tracing::debug!(samples = self.samples.len(), "samples installed");
    }

    fn classify_threshold(&self, descriptor: &Descriptor, tolerance: f32) -> Option<usize> {
        self.samples.classify(descriptor, tolerance)
    }

    fn release(self) {
        tracing::info!("releasing ONNX sessions");
    }
}
