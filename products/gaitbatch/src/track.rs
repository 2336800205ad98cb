use std::path::Path;

use gait_infer::{Coord, PartId, PoseDetection};

use crate::error::BatchError;

/// The six lower-body joints collected across the run, in CSV column order
pub const TRACKED_PARTS: [PartId; 6] = [
    PartId::LeftHip,
    PartId::RightHip,
    PartId::LeftKnee,
    PartId::RightKnee,
    PartId::LeftAnkle,
    PartId::RightAnkle,
];

/// Cross-image accumulator for the tracked joints.
///
/// Storage is row-based: one `[Coord; 6]` per image that yielded at least
/// one accepted detection. The six per-joint columns therefore cannot
/// diverge in length, and serialization needs no padding policy.
#[derive(Debug, Default)]
pub struct JointTrack {
    rows: Vec<[Coord; 6]>,
}

impl JointTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tracked joints of one image's detections.
    ///
    /// Only the first detection is read: the track follows a single
    /// subject, so further people in the frame are ignored. A leading
    /// sentinel (or an empty slice) contributes nothing — the image
    /// leaves no row.
    pub fn accept(&mut self, poses: &[PoseDetection]) {
        let Some(first) = poses.first() else {
            return;
        };
        if first.is_sentinel() {
            return;
        }

        let mut row = [Coord::default(); TRACKED_PARTS.len()];
        for (slot, part) in TRACKED_PARTS.iter().enumerate() {
            row[slot] = first.keypoint(*part).position;
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[[Coord; 6]] {
        &self.rows
    }

    /// Serialize the accumulated track.
    ///
    /// The header row is always written, even for an empty track. Cells
    /// are `(y, x)` pairs; the writer quotes them because of the comma.
    pub fn write_csv(&self, path: &Path) -> Result<(), BatchError> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(TRACKED_PARTS.iter().map(|part| part.name()))?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|coord| coord.to_string()))?;
        }
        writer.flush()?;

        Ok(())
    }
}
