pub mod backend;
pub mod backends;
pub mod device;
pub mod error;
pub mod modelsource;
pub mod posenet;
pub mod session;

pub use backend::Backend;
pub use backends::OnnxBackend;
pub use device::Device;
pub use error::InferError;
pub use modelsource::ModelSource;
pub use session::Session;

pub use posenet::{
    decode_multiple_poses, Coord, Keypoint, ModelVariant, PartId, PoseDetection,
    PosenetEstimator, DEFAULT_MIN_POSE_SCORE, MAX_POSE_DETECTIONS, PART_COUNT, PART_NAMES,
};
