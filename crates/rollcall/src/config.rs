use rollcall_core::DetectionModel;
use std::path::PathBuf;

const DEFAULT_TOLERANCE: f32 = 0.4;
const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
const DEFAULT_FONT_SIZE: f32 = 24.0;

/// Workflow configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,
    /// Maximum Euclidean distance between descriptors accepted as a match. Lower is stricter.
    ///
    /// ArcFace descriptors are unit length, so distances fall in `[0, 2]` and
    /// `d = sqrt(2 - 2 * cos)`. The default 0.4 corresponds to cosine ≈ 0.92 and
    /// only accepts near-identical shots; cosine 0.4 is a distance of ≈ 1.1.
    pub tolerance: f32,
    /// Convert images to grayscale before detection.
    pub use_gray: bool,
    /// Use the CNN detector instead of the standard one.
    pub use_cnn: bool,
    /// Font used for labels on annotated images.
    pub font_path: PathBuf,
    /// Label font size in pixels.
    pub font_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            tolerance: DEFAULT_TOLERANCE,
            use_gray: true,
            use_cnn: false,
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from `ROLLCALL_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str, default: f32| {
            get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
        };

        Self {
            model_dir: get("ROLLCALL_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            tolerance: parsed("ROLLCALL_TOLERANCE", defaults.tolerance),
            use_gray: get("ROLLCALL_USE_GRAY")
                .map(|v| v != "0")
                .unwrap_or(defaults.use_gray),
            use_cnn: get("ROLLCALL_USE_CNN")
                .map(|v| v == "1")
                .unwrap_or(defaults.use_cnn),
            font_path: get("ROLLCALL_FONT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.font_path),
            font_size: parsed("ROLLCALL_FONT_SIZE", defaults.font_size),
        }
    }

    /// Path to the standard SCRFD detection model.
    pub fn detector_model_path(&self) -> String {
        self.model_path("det_500m.onnx")
    }

    /// Path to the CNN SCRFD detection model.
    pub fn cnn_model_path(&self) -> String {
        self.model_path("det_10g.onnx")
    }

    /// Path to the ArcFace recognition model.
    pub fn recognizer_model_path(&self) -> String {
        self.model_path("w600k_r50.onnx")
    }

    fn model_path(&self, file: &str) -> String {
        self.model_dir.join(file).to_string_lossy().into_owned()
    }

    pub fn recognizer_options(&self) -> RecognizerOptions {
        RecognizerOptions {
            tolerance: self.tolerance,
            use_gray: self.use_gray,
            detection: if self.use_cnn {
                DetectionModel::Cnn
            } else {
                DetectionModel::Standard
            },
        }
    }
}

/// Knobs the [`Recognizer`](crate::Recognizer) consults on every call.
#[derive(Debug, Clone, Copy)]
pub struct RecognizerOptions {
    pub tolerance: f32,
    pub use_gray: bool,
    pub detection: DetectionModel,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Config::default().recognizer_options()
    }
}
