use gait_base::Tensor;
use gait_infer::{Coord, Keypoint, PoseDetection};
use gaitbatch::draw::{draw_filled_circle, draw_line, draw_poses};

fn blank(height: usize, width: usize) -> Tensor<u8> {
    Tensor::new(vec![height, width, 3], vec![0u8; height * width * 3]).unwrap()
}

fn pixel(image: &Tensor<u8>, x: usize, y: usize) -> [u8; 3] {
    let idx = (y * image.shape[1] + x) * 3;
    [image.data[idx], image.data[idx + 1], image.data[idx + 2]]
}

#[test]
fn test_draw_line_horizontal() {
    let mut image = blank(5, 10);
    let white = [255, 255, 255];

    draw_line(&mut image, 1, 2, 8, 2, white);

    for x in 1..=8 {
        assert_eq!(pixel(&image, x, 2), white, "pixel ({}, 2) should be set", x);
    }
    assert_eq!(pixel(&image, 0, 0), [0, 0, 0]);
}

#[test]
fn test_draw_line_clips_to_bounds() {
    let mut image = blank(10, 10);
    let white = [255, 255, 255];

    // Endpoints outside the image; the visible span survives
    draw_line(&mut image, -5, 5, 15, 5, white);

    for x in 0..10 {
        assert_eq!(pixel(&image, x, 5), white);
    }
}

#[test]
fn test_draw_line_fully_outside_is_noop() {
    let mut image = blank(10, 10);

    draw_line(&mut image, -5, -5, -1, -1, [255, 255, 255]);

    assert!(image.data.iter().all(|&v| v == 0));
}

#[test]
fn test_draw_filled_circle_center() {
    let mut image = blank(10, 10);
    let red = [255, 0, 0];

    draw_filled_circle(&mut image, 5, 5, 2, red);

    assert_eq!(pixel(&image, 5, 5), red);
    assert_eq!(pixel(&image, 5, 3), red); // on the radius
    assert_eq!(pixel(&image, 0, 0), [0, 0, 0]);
}

#[test]
fn test_draw_poses_skips_low_score_pose() {
    let mut image = blank(20, 20);

    let mut pose = PoseDetection::sentinel();
    pose.score = 0.1; // below the 0.25 gate
    for keypoint in pose.keypoints.iter_mut() {
        *keypoint = Keypoint {
            score: 0.9,
            position: Coord::new(10.0, 10.0),
        };
    }

    draw_poses(&mut image, &[pose], 0.25, 0.25);

    assert!(image.data.iter().all(|&v| v == 0));
}

#[test]
fn test_draw_poses_draws_confident_keypoints() {
    let mut image = blank(20, 20);

    let mut pose = PoseDetection::sentinel();
    pose.score = 0.9;
    for keypoint in pose.keypoints.iter_mut() {
        *keypoint = Keypoint {
            score: 0.9,
            position: Coord::new(10.0, 10.0),
        };
    }

    draw_poses(&mut image, &[pose], 0.25, 0.25);

    // Keypoint dot at (10, 10)
    assert_eq!(pixel(&image, 10, 10), [255, 255, 255]);
}

#[test]
fn test_draw_poses_stops_at_sentinel() {
    let mut image = blank(20, 20);

    let mut late = PoseDetection::sentinel();
    late.score = 0.9;
    for keypoint in late.keypoints.iter_mut() {
        *keypoint = Keypoint {
            score: 0.9,
            position: Coord::new(10.0, 10.0),
        };
    }

    draw_poses(
        &mut image,
        &[PoseDetection::sentinel(), late],
        0.25,
        0.25,
    );

    assert!(image.data.iter().all(|&v| v == 0));
}
