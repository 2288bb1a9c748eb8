//! rollcall-core — the face engine.
//!
//! SCRFD finds faces, ArcFace turns each one into a descriptor, and a
//! sample index matches descriptors against known ones. All inference runs
//! on ONNX Runtime.

pub mod alignment;
pub mod detector;
pub mod engine;
pub mod recognizer;
pub mod types;

pub use detector::FaceDetector;
pub use engine::{DetectionModel, EngineError, FaceEngine, OnnxEngine};
pub use recognizer::FaceRecognizer;
pub use types::{BoundingBox, Descriptor, DetectedFace, Rect, SampleIndex};
