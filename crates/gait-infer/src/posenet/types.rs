use std::fmt;

/// Number of parts in the PoseNet vocabulary
pub const PART_COUNT: usize = 17;

/// Part names in model channel order. This exact casing reaches the text
/// dumps and the aggregated CSV header, so it is part of the output format.
pub const PART_NAMES: [&str; PART_COUNT] = [
    "nose",
    "leftEye",
    "rightEye",
    "leftEar",
    "rightEar",
    "leftShoulder",
    "rightShoulder",
    "leftElbow",
    "rightElbow",
    "leftWrist",
    "rightWrist",
    "leftHip",
    "rightHip",
    "leftKnee",
    "rightKnee",
    "leftAnkle",
    "rightAnkle",
];

/// Part indices for human pose keypoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartId {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl PartId {
    pub fn name(self) -> &'static str {
        PART_NAMES[self as usize]
    }
}

impl From<PartId> for usize {
    fn from(part: PartId) -> usize {
        part as usize
    }
}

impl TryFrom<usize> for PartId {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PartId::Nose),
            1 => Ok(PartId::LeftEye),
            2 => Ok(PartId::RightEye),
            3 => Ok(PartId::LeftEar),
            4 => Ok(PartId::RightEar),
            5 => Ok(PartId::LeftShoulder),
            6 => Ok(PartId::RightShoulder),
            7 => Ok(PartId::LeftElbow),
            8 => Ok(PartId::RightElbow),
            9 => Ok(PartId::LeftWrist),
            10 => Ok(PartId::RightWrist),
            11 => Ok(PartId::LeftHip),
            12 => Ok(PartId::RightHip),
            13 => Ok(PartId::LeftKnee),
            14 => Ok(PartId::RightKnee),
            15 => Ok(PartId::LeftAnkle),
            16 => Ok(PartId::RightAnkle),
            _ => Err(format!(
                "invalid part index: {}. Must be in range 0-16.",
                value
            )),
        }
    }
}

/// Image-space coordinate in PoseNet's row-major `(y, x)` convention
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub y: f32,
    pub x: f32,
}

impl Coord {
    pub fn new(y: f32, x: f32) -> Self {
        Self { y, x }
    }

    /// Per-axis rescale, used to map model-space coordinates back to the
    /// original image's pixel space.
    pub fn scaled(self, scale: (f32, f32)) -> Self {
        Self {
            y: self.y * scale.0,
            x: self.x * scale.1,
        }
    }

    pub fn squared_distance(self, other: Self) -> f32 {
        let dy = self.y - other.y;
        let dx = self.x - other.x;
        dy * dy + dx * dx
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.y, self.x)
    }
}

/// A single keypoint; part identity is implied by array index
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keypoint {
    pub score: f32,
    pub position: Coord,
}

/// One candidate person instance in an image.
///
/// The decoder returns a fixed-length sequence of these: valid detections
/// first, then zero-score sentinel padding. A zero overall score may only
/// appear for padding slots beyond the last real detection.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDetection {
    pub score: f32,
    pub keypoints: [Keypoint; PART_COUNT],
}

impl PoseDetection {
    /// Padding slot marking the end of valid detections
    pub fn sentinel() -> Self {
        Self {
            score: 0.0,
            keypoints: [Keypoint::default(); PART_COUNT],
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.score == 0.0
    }

    /// Get a keypoint by its semantic part id
    pub fn keypoint(&self, part: PartId) -> &Keypoint {
        &self.keypoints[usize::from(part)]
    }
}
