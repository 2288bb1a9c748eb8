//! rollcall — enroll labeled face photos, then find those people in group photos.
//!
//! [`Recognizer`] drives a [`FaceEngine`](rollcall_core::FaceEngine): it
//! builds the [`Dataset`], installs it as the engine's sample index, and
//! classifies faces. [`Annotator`] draws the results.

pub mod annotate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod imaging;
pub mod workflow;

pub use annotate::Annotator;
pub use config::{Config, RecognizerOptions};
pub use dataset::{Dataset, DatasetEntry};
pub use error::{Error, Result};
pub use workflow::{ClassifiedFace, Recognizer};
