use crate::InferError;

/// Name of the image input in the converted pose graphs
pub const INPUT_NAME: &str = "image";

/// Names of the four output tensors
pub const OUTPUT_HEATMAPS: &str = "heatmaps";
pub const OUTPUT_OFFSETS: &str = "offsets";
pub const OUTPUT_DISPLACEMENT_FWD: &str = "displacement_fwd";
pub const OUTPUT_DISPLACEMENT_BWD: &str = "displacement_bwd";

/// A converted MobileNet pose checkpoint, selected by its numeric id
/// (the depth-multiplier naming of the upstream checkpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelVariant {
    pub id: u32,
    pub output_stride: usize,
}

impl ModelVariant {
    /// Look up a variant by checkpoint id (50, 75, 100 or 101).
    pub fn from_id(id: u32) -> Result<Self, InferError> {
        match id {
            50 | 75 | 100 | 101 => Ok(Self {
                id,
                output_stride: 16,
            }),
            _ => Err(InferError::ModelLoad(format!(
                "unknown model variant id {}, expected 50, 75, 100 or 101",
                id
            ))),
        }
    }

    /// Canonical file name of the converted checkpoint
    pub fn file_name(&self) -> String {
        format!("posenet-mobilenet-{}.onnx", self.id)
    }
}
