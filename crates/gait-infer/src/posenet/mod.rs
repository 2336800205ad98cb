mod decode;
mod estimator;
mod types;
mod variant;

pub use decode::{decode_multiple_poses, DEFAULT_MIN_POSE_SCORE, MAX_POSE_DETECTIONS};
pub use estimator::PosenetEstimator;
pub use types::{Coord, Keypoint, PartId, PoseDetection, PART_COUNT, PART_NAMES};
pub use variant::{
    ModelVariant, INPUT_NAME, OUTPUT_DISPLACEMENT_BWD, OUTPUT_DISPLACEMENT_FWD, OUTPUT_HEATMAPS,
    OUTPUT_OFFSETS,
};
