use gait_base::Tensor;

use crate::InferError;

use super::types::{Coord, Keypoint, PartId, PoseDetection, PART_COUNT};

/// Maximum number of person instances decoded per image
pub const MAX_POSE_DETECTIONS: usize = 10;

/// Default minimum instance score for an assembled pose to be kept
pub const DEFAULT_MIN_POSE_SCORE: f32 = 0.25;

/// Minimum heatmap score for a cell to enter the root candidate queue
const PART_SCORE_THRESHOLD: f32 = 0.5;

/// Radius in output-image pixels within which two keypoints of the same
/// part are considered the same person
const NMS_RADIUS: f32 = 20.0;

/// Window radius (in heatmap cells) for the local-maximum test
const LOCAL_MAXIMUM_RADIUS: usize = 1;

/// Mid-range edges of the part graph, parent before child. The decoder
/// grows a pose from its root by walking these edges forward (parent to
/// child, via the forward displacement field) and backward (child to
/// parent, via the backward field).
const POSE_CHAIN: [(PartId, PartId); 16] = [
    (PartId::Nose, PartId::LeftEye),
    (PartId::LeftEye, PartId::LeftEar),
    (PartId::Nose, PartId::RightEye),
    (PartId::RightEye, PartId::RightEar),
    (PartId::Nose, PartId::LeftShoulder),
    (PartId::LeftShoulder, PartId::LeftElbow),
    (PartId::LeftElbow, PartId::LeftWrist),
    (PartId::LeftShoulder, PartId::LeftHip),
    (PartId::LeftHip, PartId::LeftKnee),
    (PartId::LeftKnee, PartId::LeftAnkle),
    (PartId::Nose, PartId::RightShoulder),
    (PartId::RightShoulder, PartId::RightElbow),
    (PartId::RightElbow, PartId::RightWrist),
    (PartId::RightShoulder, PartId::RightHip),
    (PartId::RightHip, PartId::RightKnee),
    (PartId::RightKnee, PartId::RightAnkle),
];

/// A heatmap cell that may seed a new pose
struct PartCandidate {
    score: f32,
    part: usize,
    cell_y: usize,
    cell_x: usize,
}

/// Decode multi-person poses from the four raw model output grids.
///
/// Expected shapes for a heatmap grid of `H x W` cells:
/// - `heatmaps`: `[H, W, 17]`, probabilities (sigmoid applied in-graph);
/// - `offsets`: `[H, W, 34]`, y-offset channels then x-offset channels;
/// - `displacements_*`: `[H, W, 32]`, 16 edge y-channels then x-channels.
///
/// The result always has length `max_pose_detections`: decoded poses in
/// decode order followed by zero-score sentinel padding. Consumers stop at
/// the first sentinel.
pub fn decode_multiple_poses(
    heatmaps: &Tensor<f32>,
    offsets: &Tensor<f32>,
    displacements_fwd: &Tensor<f32>,
    displacements_bwd: &Tensor<f32>,
    output_stride: usize,
    max_pose_detections: usize,
    min_pose_score: f32,
) -> Result<Vec<PoseDetection>, InferError> {
    validate_grids(heatmaps, offsets, displacements_fwd, displacements_bwd)?;

    let queue = build_part_queue(heatmaps);

    let mut poses: Vec<PoseDetection> = Vec::new();
    for candidate in queue {
        if poses.len() >= max_pose_detections {
            break;
        }

        let root_coord = cell_to_image_coord(
            candidate.cell_y,
            candidate.cell_x,
            candidate.part,
            output_stride,
            offsets,
        );

        // A root claimed by an already-decoded pose would rebuild the
        // same person
        if claimed_by_existing(&poses, candidate.part, root_coord) {
            continue;
        }

        let keypoints = decode_pose(
            candidate.score,
            candidate.part,
            root_coord,
            heatmaps,
            offsets,
            output_stride,
            displacements_fwd,
            displacements_bwd,
        );

        let score = instance_score(&poses, &keypoints);
        if min_pose_score == 0.0 || score >= min_pose_score {
            poses.push(PoseDetection { score, keypoints });
        }
    }

    while poses.len() < max_pose_detections {
        poses.push(PoseDetection::sentinel());
    }

    Ok(poses)
}

fn validate_grids(
    heatmaps: &Tensor<f32>,
    offsets: &Tensor<f32>,
    displacements_fwd: &Tensor<f32>,
    displacements_bwd: &Tensor<f32>,
) -> Result<(), InferError> {
    if heatmaps.ndim() != 3 || heatmaps.shape[2] != PART_COUNT {
        return Err(InferError::ShapeMismatch {
            expected: format!("[H, W, {}]", PART_COUNT),
            got: format!("{:?}", heatmaps.shape),
        });
    }
    let (h, w) = (heatmaps.shape[0], heatmaps.shape[1]);

    let expect = |t: &Tensor<f32>, channels: usize, what: &str| -> Result<(), InferError> {
        if t.shape != [h, w, channels] {
            return Err(InferError::ShapeMismatch {
                expected: format!("[{}, {}, {}] for {}", h, w, channels, what),
                got: format!("{:?}", t.shape),
            });
        }
        Ok(())
    };

    expect(offsets, 2 * PART_COUNT, "offsets")?;
    expect(displacements_fwd, 2 * POSE_CHAIN.len(), "displacements_fwd")?;
    expect(displacements_bwd, 2 * POSE_CHAIN.len(), "displacements_bwd")?;
    Ok(())
}

/// Scan the heatmaps for local-maximum cells above the part score
/// threshold, highest score first.
fn build_part_queue(heatmaps: &Tensor<f32>) -> Vec<PartCandidate> {
    let (h, w) = (heatmaps.shape[0], heatmaps.shape[1]);
    let mut queue = Vec::new();

    for cell_y in 0..h {
        for cell_x in 0..w {
            for part in 0..PART_COUNT {
                let score = heatmaps.at3(cell_y, cell_x, part);
                if score < PART_SCORE_THRESHOLD {
                    continue;
                }
                if is_local_maximum(heatmaps, cell_y, cell_x, part) {
                    queue.push(PartCandidate {
                        score,
                        part,
                        cell_y,
                        cell_x,
                    });
                }
            }
        }
    }

    queue.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    queue
}

fn is_local_maximum(heatmaps: &Tensor<f32>, cell_y: usize, cell_x: usize, part: usize) -> bool {
    let (h, w) = (heatmaps.shape[0], heatmaps.shape[1]);
    let score = heatmaps.at3(cell_y, cell_x, part);

    let y_start = cell_y.saturating_sub(LOCAL_MAXIMUM_RADIUS);
    let y_end = (cell_y + LOCAL_MAXIMUM_RADIUS).min(h - 1);
    let x_start = cell_x.saturating_sub(LOCAL_MAXIMUM_RADIUS);
    let x_end = (cell_x + LOCAL_MAXIMUM_RADIUS).min(w - 1);

    for y in y_start..=y_end {
        for x in x_start..=x_end {
            if heatmaps.at3(y, x, part) > score {
                return false;
            }
        }
    }
    true
}

/// Refine a heatmap cell to an image-space coordinate using the offset grid
fn cell_to_image_coord(
    cell_y: usize,
    cell_x: usize,
    part: usize,
    output_stride: usize,
    offsets: &Tensor<f32>,
) -> Coord {
    Coord {
        y: (cell_y * output_stride) as f32 + offsets.at3(cell_y, cell_x, part),
        x: (cell_x * output_stride) as f32 + offsets.at3(cell_y, cell_x, PART_COUNT + part),
    }
}

fn claimed_by_existing(poses: &[PoseDetection], part: usize, coord: Coord) -> bool {
    let squared_radius = NMS_RADIUS * NMS_RADIUS;
    poses
        .iter()
        .any(|pose| pose.keypoints[part].position.squared_distance(coord) <= squared_radius)
}

/// Grow a full 17-part pose from a root keypoint by walking the part graph
/// through the displacement fields.
#[allow(clippy::too_many_arguments)]
fn decode_pose(
    root_score: f32,
    root_part: usize,
    root_coord: Coord,
    heatmaps: &Tensor<f32>,
    offsets: &Tensor<f32>,
    output_stride: usize,
    displacements_fwd: &Tensor<f32>,
    displacements_bwd: &Tensor<f32>,
) -> [Keypoint; PART_COUNT] {
    let mut keypoints = [Keypoint::default(); PART_COUNT];
    keypoints[root_part] = Keypoint {
        score: root_score,
        position: root_coord,
    };

    // Backward pass: child to parent
    for edge in (0..POSE_CHAIN.len()).rev() {
        let (target, source) = (POSE_CHAIN[edge].0 as usize, POSE_CHAIN[edge].1 as usize);
        if keypoints[source].score > 0.0 && keypoints[target].score == 0.0 {
            keypoints[target] = traverse_to_target(
                edge,
                keypoints[source].position,
                target,
                heatmaps,
                offsets,
                output_stride,
                displacements_bwd,
            );
        }
    }

    // Forward pass: parent to child
    for edge in 0..POSE_CHAIN.len() {
        let (source, target) = (POSE_CHAIN[edge].0 as usize, POSE_CHAIN[edge].1 as usize);
        if keypoints[source].score > 0.0 && keypoints[target].score == 0.0 {
            keypoints[target] = traverse_to_target(
                edge,
                keypoints[source].position,
                target,
                heatmaps,
                offsets,
                output_stride,
                displacements_fwd,
            );
        }
    }

    keypoints
}

/// Follow one displacement edge from a located source keypoint to its
/// neighbor part, re-anchoring on the heatmap grid at both ends.
fn traverse_to_target(
    edge: usize,
    source: Coord,
    target_part: usize,
    heatmaps: &Tensor<f32>,
    offsets: &Tensor<f32>,
    output_stride: usize,
    displacements: &Tensor<f32>,
) -> Keypoint {
    let (h, w) = (heatmaps.shape[0], heatmaps.shape[1]);
    let num_edges = displacements.shape[2] / 2;

    let source_y = nearest_cell(source.y, output_stride, h);
    let source_x = nearest_cell(source.x, output_stride, w);

    let displaced = Coord {
        y: source.y + displacements.at3(source_y, source_x, edge),
        x: source.x + displacements.at3(source_y, source_x, num_edges + edge),
    };

    let target_y = nearest_cell(displaced.y, output_stride, h);
    let target_x = nearest_cell(displaced.x, output_stride, w);

    Keypoint {
        score: heatmaps.at3(target_y, target_x, target_part),
        position: cell_to_image_coord(target_y, target_x, target_part, output_stride, offsets),
    }
}

fn nearest_cell(coord: f32, output_stride: usize, dim: usize) -> usize {
    ((coord / output_stride as f32).round() as i64).clamp(0, dim as i64 - 1) as usize
}

/// Mean keypoint score of a candidate pose, counting only keypoints not
/// already claimed by an earlier pose's same part.
fn instance_score(existing: &[PoseDetection], keypoints: &[Keypoint; PART_COUNT]) -> f32 {
    let squared_radius = NMS_RADIUS * NMS_RADIUS;
    let mut sum = 0.0;
    for (part, keypoint) in keypoints.iter().enumerate() {
        let claimed = existing.iter().any(|pose| {
            pose.keypoints[part]
                .position
                .squared_distance(keypoint.position)
                <= squared_radius
        });
        if !claimed {
            sum += keypoint.score;
        }
    }
    sum / PART_COUNT as f32
}
