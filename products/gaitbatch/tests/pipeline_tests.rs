use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use gait_base::Tensor;
use gait_infer::{Coord, Keypoint, PartId, PoseDetection, MAX_POSE_DETECTIONS};
use gaitbatch::detector::{DetectedFrame, FrameDetector};
use gaitbatch::{pipeline, Args, BatchError};

/// Detector returning canned poses per file name; never touches the model
struct MockDetector {
    output_scale: (f32, f32),
    poses_by_name: HashMap<String, Vec<PoseDetection>>,
}

impl MockDetector {
    fn new(output_scale: (f32, f32)) -> Self {
        Self {
            output_scale,
            poses_by_name: HashMap::new(),
        }
    }

    fn with_poses(mut self, name: &str, poses: Vec<PoseDetection>) -> Self {
        self.poses_by_name.insert(name.to_string(), poses);
        self
    }
}

impl FrameDetector for MockDetector {
    fn detect(&mut self, path: &Path) -> Result<DetectedFrame, BatchError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        let mut poses = self.poses_by_name.get(&name).cloned().unwrap_or_default();
        while poses.len() < MAX_POSE_DETECTIONS {
            poses.push(PoseDetection::sentinel());
        }
        Ok(DetectedFrame {
            poses,
            output_scale: self.output_scale,
            draw_image: Tensor::new(vec![8, 8, 3], vec![0u8; 8 * 8 * 3]).unwrap(),
        })
    }
}

/// Single detection with the six tracked joints set; leftHip at (y, x)
fn detection_with_left_hip(y: f32, x: f32) -> PoseDetection {
    let mut pose = PoseDetection::sentinel();
    pose.score = 0.9;
    for part in [
        PartId::LeftHip,
        PartId::RightHip,
        PartId::LeftKnee,
        PartId::RightKnee,
        PartId::LeftAnkle,
        PartId::RightAnkle,
    ] {
        pose.keypoints[part as usize] = Keypoint {
            score: 0.8,
            position: Coord::new(y, x),
        };
    }
    pose
}

struct TestDirs {
    root: PathBuf,
    images: PathBuf,
    overlays: PathBuf,
    texts: PathBuf,
    csv: PathBuf,
}

fn test_dirs(name: &str) -> TestDirs {
    let root = std::env::temp_dir().join(format!("gait-pipeline-test-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&root);
    let images = root.join("images");
    std::fs::create_dir_all(&images).unwrap();
    TestDirs {
        overlays: root.join("overlays"),
        texts: root.join("texts"),
        csv: root.join("csv"),
        images,
        root,
    }
}

fn test_args(dirs: &TestDirs) -> Args {
    Args::parse_from([
        "gaitbatch",
        "--notxt",
        "--image-dir",
        dirs.images.to_str().unwrap(),
        "--output-dir",
        dirs.overlays.to_str().unwrap(),
        "--output-csv-dir",
        dirs.texts.to_str().unwrap(),
        "--output-video",
        dirs.csv.to_str().unwrap(),
        "--output-name",
        "run",
    ])
}

#[test]
fn test_run_two_images_two_rows() {
    let dirs = test_dirs("two-rows");
    std::fs::write(dirs.images.join("a.png"), b"stub").unwrap();
    std::fs::write(dirs.images.join("b.png"), b"stub").unwrap();

    let mut detector = MockDetector::new((1.0, 1.0))
        .with_poses("a.png", vec![detection_with_left_hip(10.0, 20.0)])
        .with_poses("b.png", vec![detection_with_left_hip(30.0, 40.0)]);

    let summary = pipeline::run(&test_args(&dirs), &mut detector).unwrap();
    assert_eq!(summary.files_processed, 2);

    let content = std::fs::read_to_string(dirs.csv.join("run.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "leftHip,rightHip,leftKnee,rightKnee,leftAnkle,rightAnkle"
    );
    // Discovery is sorted, so a.png's row comes first
    assert!(lines[1].starts_with("\"(10, 20)\""));
    assert!(lines[2].starts_with("\"(30, 40)\""));

    std::fs::remove_dir_all(&dirs.root).ok();
}

#[test]
fn test_run_overlay_count_matches_input_count() {
    let dirs = test_dirs("overlay-count");
    for name in ["a.png", "b.jpg", "c.png"] {
        std::fs::write(dirs.images.join(name), b"stub").unwrap();
    }
    // A non-image file must not be processed
    std::fs::write(dirs.images.join("notes.txt"), b"stub").unwrap();

    let mut detector = MockDetector::new((1.0, 1.0));
    let summary = pipeline::run(&test_args(&dirs), &mut detector).unwrap();
    assert_eq!(summary.files_processed, 3);

    let overlays = std::fs::read_dir(&dirs.overlays).unwrap().count();
    assert_eq!(overlays, 3);

    std::fs::remove_dir_all(&dirs.root).ok();
}

#[test]
fn test_run_zero_detections_leaves_no_row() {
    let dirs = test_dirs("no-detections");
    std::fs::write(dirs.images.join("a.png"), b"stub").unwrap();

    // Mock returns pure sentinel padding for a.png
    let mut detector = MockDetector::new((1.0, 1.0));
    pipeline::run(&test_args(&dirs), &mut detector).unwrap();

    let csv = std::fs::read_to_string(dirs.csv.join("run.csv")).unwrap();
    assert_eq!(
        csv,
        "leftHip,rightHip,leftKnee,rightKnee,leftAnkle,rightAnkle\n"
    );

    let text = std::fs::read_to_string(dirs.texts.join("a.txt")).unwrap();
    assert!(text.starts_with("Results for image:"));
    assert_eq!(text.lines().count(), 1);

    std::fs::remove_dir_all(&dirs.root).ok();
}

#[test]
fn test_run_rescales_coordinates_linearly() {
    let dirs = test_dirs("rescale");
    std::fs::write(dirs.images.join("a.png"), b"stub").unwrap();

    // Model-space (10, 20) under output scale (2, 3) must serialize as
    // (20, 60)
    let mut detector = MockDetector::new((2.0, 3.0))
        .with_poses("a.png", vec![detection_with_left_hip(10.0, 20.0)]);

    pipeline::run(&test_args(&dirs), &mut detector).unwrap();

    let content = std::fs::read_to_string(dirs.csv.join("run.csv")).unwrap();
    assert!(content.lines().nth(1).unwrap().starts_with("\"(20, 60)\""));

    std::fs::remove_dir_all(&dirs.root).ok();
}

#[test]
fn test_run_twice_produces_identical_text_dumps() {
    let dirs = test_dirs("idempotent");
    std::fs::write(dirs.images.join("a.png"), b"stub").unwrap();

    let args = test_args(&dirs);
    let mut detector = MockDetector::new((1.0, 1.0))
        .with_poses("a.png", vec![detection_with_left_hip(10.0, 20.0)]);

    pipeline::run(&args, &mut detector).unwrap();
    let first = std::fs::read(dirs.texts.join("a.txt")).unwrap();

    pipeline::run(&args, &mut detector).unwrap();
    let second = std::fs::read(dirs.texts.join("a.txt")).unwrap();

    assert_eq!(first, second);

    std::fs::remove_dir_all(&dirs.root).ok();
}

#[test]
fn test_run_missing_image_dir_is_fatal() {
    let dirs = test_dirs("missing-input");
    std::fs::remove_dir_all(&dirs.images).unwrap();

    let mut detector = MockDetector::new((1.0, 1.0));
    let result = pipeline::run(&test_args(&dirs), &mut detector);
    assert!(result.is_err());

    std::fs::remove_dir_all(&dirs.root).ok();
}

#[test]
fn test_discover_images_filters_and_sorts() {
    let dirs = test_dirs("discover");
    for name in ["c.png", "a.jpg", "b.png", "skip.txt", "skip.jpeg"] {
        std::fs::write(dirs.images.join(name), b"stub").unwrap();
    }

    let files = pipeline::discover_images(&dirs.images).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, ["a.jpg", "b.png", "c.png"]);

    std::fs::remove_dir_all(&dirs.root).ok();
}
