use gait_base::Tensor;
use gait_infer::{PartId, PoseDetection};

const SEGMENT_COLOR: [u8; 3] = [0, 255, 255];
const KEYPOINT_COLOR: [u8; 3] = [255, 255, 255];
const KEYPOINT_RADIUS: i32 = 3;

/// Adjacent part pairs of the rendered skeleton
const CONNECTED_PARTS: [(PartId, PartId); 12] = [
    (PartId::LeftHip, PartId::LeftShoulder),
    (PartId::LeftElbow, PartId::LeftShoulder),
    (PartId::LeftElbow, PartId::LeftWrist),
    (PartId::LeftHip, PartId::LeftKnee),
    (PartId::LeftKnee, PartId::LeftAnkle),
    (PartId::RightHip, PartId::RightShoulder),
    (PartId::RightElbow, PartId::RightShoulder),
    (PartId::RightElbow, PartId::RightWrist),
    (PartId::RightHip, PartId::RightKnee),
    (PartId::RightKnee, PartId::RightAnkle),
    (PartId::LeftShoulder, PartId::RightShoulder),
    (PartId::LeftHip, PartId::RightHip),
];

/// Draw skeletons and keypoint dots for every accepted pose onto an HWC
/// RGB8 image.
///
/// Poses below `min_pose_score` are skipped; segments and dots are drawn
/// only where the keypoint scores reach `min_part_score`. Iteration stops
/// at the first sentinel.
pub fn draw_poses(
    image: &mut Tensor<u8>,
    poses: &[PoseDetection],
    min_pose_score: f32,
    min_part_score: f32,
) {
    for pose in poses {
        if pose.is_sentinel() {
            break;
        }
        if pose.score < min_pose_score {
            continue;
        }

        for (a, b) in &CONNECTED_PARTS {
            let kp_a = pose.keypoint(*a);
            let kp_b = pose.keypoint(*b);
            if kp_a.score >= min_part_score && kp_b.score >= min_part_score {
                draw_line(
                    image,
                    kp_a.position.x as i32,
                    kp_a.position.y as i32,
                    kp_b.position.x as i32,
                    kp_b.position.y as i32,
                    SEGMENT_COLOR,
                );
            }
        }

        for keypoint in &pose.keypoints {
            if keypoint.score >= min_part_score {
                draw_filled_circle(
                    image,
                    keypoint.position.x as i32,
                    keypoint.position.y as i32,
                    KEYPOINT_RADIUS,
                    KEYPOINT_COLOR,
                );
            }
        }
    }
}

/// Draw a line using Bresenham's algorithm with clipping
pub fn draw_line(
    image: &mut Tensor<u8>,
    mut x0: i32,
    mut y0: i32,
    mut x1: i32,
    mut y1: i32,
    color: [u8; 3],
) {
    let (height, width) = (image.shape[0] as i32, image.shape[1] as i32);

    // Cohen-Sutherland clipping to the image bounds
    loop {
        let outcode0 = compute_outcode(x0, y0, width, height);
        let outcode1 = compute_outcode(x1, y1, width, height);

        if (outcode0 | outcode1) == 0 {
            // Both endpoints inside
            break;
        } else if (outcode0 & outcode1) != 0 {
            // Entirely outside one edge
            return;
        } else {
            let outcode = if outcode0 != 0 { outcode0 } else { outcode1 };
            let (x, y) = clip_point(x0, y0, x1, y1, outcode, width, height);

            if outcode == outcode0 {
                x0 = x;
                y0 = y;
            } else {
                x1 = x;
                y1 = y;
            }
        }
    }

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        set_pixel(image, x0 as usize, y0 as usize, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draw a filled circle with clipping
pub fn draw_filled_circle(image: &mut Tensor<u8>, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let (height, width) = (image.shape[0] as i32, image.shape[1] as i32);
    let r2 = radius * radius;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                let x = cx + dx;
                let y = cy + dy;

                if x >= 0 && x < width && y >= 0 && y < height {
                    set_pixel(image, x as usize, y as usize, color);
                }
            }
        }
    }
}

fn set_pixel(image: &mut Tensor<u8>, x: usize, y: usize, color: [u8; 3]) {
    let width = image.shape[1];
    let idx = (y * width + x) * 3;
    image.data[idx..idx + 3].copy_from_slice(&color);
}

// Cohen-Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn compute_outcode(x: i32, y: i32, width: i32, height: i32) -> u8 {
    let mut code = INSIDE;
    if x < 0 {
        code |= LEFT;
    } else if x >= width {
        code |= RIGHT;
    }
    if y < 0 {
        code |= TOP;
    } else if y >= height {
        code |= BOTTOM;
    }
    code
}

fn clip_point(
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    outcode: u8,
    width: i32,
    height: i32,
) -> (i32, i32) {
    let dx = x1 - x0;
    let dy = y1 - y0;

    if outcode & TOP != 0 {
        let x = x0 + dx * (0 - y0) / dy;
        (x, 0)
    } else if outcode & BOTTOM != 0 {
        let x = x0 + dx * (height - 1 - y0) / dy;
        (x, height - 1)
    } else if outcode & LEFT != 0 {
        let y = y0 + dy * (0 - x0) / dx;
        (0, y)
    } else {
        let y = y0 + dy * (width - 1 - x0) / dx;
        (width - 1, y)
    }
}
