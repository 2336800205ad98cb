use gait_base::Tensor;
use std::collections::HashMap;

use crate::InferError;

use super::decode::{decode_multiple_poses, DEFAULT_MIN_POSE_SCORE, MAX_POSE_DETECTIONS};
use super::types::PoseDetection;
use super::variant::{
    ModelVariant, INPUT_NAME, OUTPUT_DISPLACEMENT_BWD, OUTPUT_DISPLACEMENT_FWD, OUTPUT_HEATMAPS,
    OUTPUT_OFFSETS,
};

/// End-to-end pose estimation over a loaded session.
///
/// Runs the graph on a prepared NHWC input and decodes the four output
/// grids into a sentinel-padded detection sequence. Input preparation and
/// coordinate rescaling to the source image belong to the caller.
pub struct PosenetEstimator {
    session: Box<dyn crate::Session>,
    variant: ModelVariant,
    max_pose_detections: usize,
    min_pose_score: f32,
}

impl PosenetEstimator {
    /// Create an estimator for a model variant
    ///
    /// # Arguments
    /// * `variant` - Checkpoint variant (decides the output stride)
    /// * `model` - Model source (file path or in-memory bytes)
    /// * `backend` - Backend to load the model with (e.g. `OnnxBackend`)
    pub fn new(
        variant: ModelVariant,
        model: crate::ModelSource,
        backend: &dyn crate::Backend,
    ) -> Result<Self, InferError> {
        let session = backend.load_model(model)?;

        Ok(Self {
            session,
            variant,
            max_pose_detections: MAX_POSE_DETECTIONS,
            min_pose_score: DEFAULT_MIN_POSE_SCORE,
        })
    }

    /// Set the maximum decoded pose count (builder pattern)
    pub fn with_max_pose_detections(mut self, max: usize) -> Self {
        self.max_pose_detections = max;
        self
    }

    /// Set the minimum instance score (builder pattern)
    pub fn with_min_pose_score(mut self, score: f32) -> Self {
        self.min_pose_score = score;
        self
    }

    pub fn output_stride(&self) -> usize {
        self.variant.output_stride
    }

    /// Run pose estimation on a prepared input tensor
    ///
    /// # Arguments
    /// * `input` - NHWC tensor `[1, H, W, 3]` normalized to `[-1.0, 1.0]`
    ///
    /// # Returns
    /// Fixed-length detection sequence in model-input pixel space, valid
    /// poses first, zero-score sentinels after.
    pub fn estimate(&mut self, input: &Tensor<f32>) -> Result<Vec<PoseDetection>, InferError> {
        if input.ndim() != 4 || input.shape[0] != 1 || input.shape[3] != 3 {
            return Err(InferError::ShapeMismatch {
                expected: "[1, H, W, 3]".to_string(),
                got: format!("{:?}", input.shape),
            });
        }

        let mut outputs = self.session.run(&[(INPUT_NAME, input.clone())])?;

        let heatmaps = take_grid(&mut outputs, OUTPUT_HEATMAPS)?;
        let offsets = take_grid(&mut outputs, OUTPUT_OFFSETS)?;
        let displacements_fwd = take_grid(&mut outputs, OUTPUT_DISPLACEMENT_FWD)?;
        let displacements_bwd = take_grid(&mut outputs, OUTPUT_DISPLACEMENT_BWD)?;

        decode_multiple_poses(
            &heatmaps,
            &offsets,
            &displacements_fwd,
            &displacements_bwd,
            self.variant.output_stride,
            self.max_pose_detections,
            self.min_pose_score,
        )
    }
}

/// Pull a named output and squeeze its leading batch axis
fn take_grid(
    outputs: &mut HashMap<String, Tensor<f32>>,
    name: &str,
) -> Result<Tensor<f32>, InferError> {
    let tensor = outputs
        .remove(name)
        .ok_or_else(|| InferError::BackendError(format!("model output '{}' missing", name)))?;

    if tensor.ndim() != 4 || tensor.shape[0] != 1 {
        return Err(InferError::ShapeMismatch {
            expected: format!("[1, H, W, C] for output '{}'", name),
            got: format!("{:?}", tensor.shape),
        });
    }

    let shape = tensor.shape[1..].to_vec();
    Ok(Tensor::new(shape, tensor.data)?)
}
