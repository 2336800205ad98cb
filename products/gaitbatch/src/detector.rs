use std::path::Path;

use gait_base::Tensor;
use gait_image::{load_rgb8, prepare_input};
use gait_infer::{PoseDetection, PosenetEstimator};

use crate::error::BatchError;

/// One image's worth of model-space detections plus what the exporter
/// needs to render and rescale them.
pub struct DetectedFrame {
    /// Sentinel-padded detections in model-input pixel space
    pub poses: Vec<PoseDetection>,
    /// Per-axis (y, x) map from model space back to source pixels
    pub output_scale: (f32, f32),
    /// Unscaled copy of the source image for overlay rendering
    pub draw_image: Tensor<u8>,
}

/// The pipeline's seam to the pose model: load, infer, decode, one call
/// per file. Tests substitute a mock.
pub trait FrameDetector {
    fn detect(&mut self, path: &Path) -> Result<DetectedFrame, BatchError>;
}

/// Production detector: image file, prepared input tensor, ONNX session,
/// multi-pose decode.
pub struct PosenetDetector {
    estimator: PosenetEstimator,
    scale_factor: f32,
}

impl PosenetDetector {
    pub fn new(estimator: PosenetEstimator, scale_factor: f32) -> Self {
        Self {
            estimator,
            scale_factor,
        }
    }
}

impl FrameDetector for PosenetDetector {
    fn detect(&mut self, path: &Path) -> Result<DetectedFrame, BatchError> {
        let draw_image = load_rgb8(path)?;
        let (input, output_scale) = prepare_input(
            &draw_image,
            self.scale_factor,
            self.estimator.output_stride(),
        )?;
        let poses = self.estimator.estimate(&input)?;

        Ok(DetectedFrame {
            poses,
            output_scale,
            draw_image,
        })
    }
}
