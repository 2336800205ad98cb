use std::path::{Path, PathBuf};
use std::time::Instant;

use gait_infer::PoseDetection;

use crate::args::Args;
use crate::detector::FrameDetector;
use crate::error::BatchError;
use crate::export::{export_frame, ExportConfig};
use crate::track::JointTrack;

pub struct RunSummary {
    pub files_processed: usize,
    pub elapsed_seconds: f64,
    pub fps: f64,
}

/// Drive the batch: one sequential pass over the discovered files, then
/// the aggregated CSV and the throughput line.
///
/// Any failure — unreadable image, inference error, output I/O — aborts
/// the run. Artifacts already written stay on disk.
pub fn run(args: &Args, detector: &mut dyn FrameDetector) -> Result<RunSummary, BatchError> {
    ensure_output_dirs(args)?;

    let files = discover_images(&args.image_dir)?;
    log::info!("discovered {} images in {}", files.len(), args.image_dir.display());

    let config = ExportConfig {
        overlay_dir: args.overlay_dir().map(Path::to_path_buf),
        text_dir: args.text_dir().map(Path::to_path_buf),
        emit_text: !args.notxt,
    };

    let mut track = JointTrack::new();
    let start = Instant::now();

    for path in &files {
        let mut frame = detector.detect(path)?;
        rescale_poses(&mut frame.poses, frame.output_scale);
        export_frame(&config, &args.image_dir, path, &frame.poses, &mut frame.draw_image)?;
        track.accept(&frame.poses);
    }

    if let Some(csv_dir) = args.csv_dir() {
        let csv_path = csv_dir.join(format!("{}.csv", args.output_name));
        track.write_csv(&csv_path)?;
        log::info!("wrote {} track rows to {}", track.len(), csv_path.display());
    }

    let elapsed_seconds = start.elapsed().as_secs_f64();
    let fps = files.len() as f64 / elapsed_seconds;
    println!("Average FPS: {}", fps);

    Ok(RunSummary {
        files_processed: files.len(),
        elapsed_seconds,
        fps,
    })
}

/// Discover input files directly inside `image_dir` (non-recursive):
/// every plain file with a `.png` or `.jpg` extension.
///
/// Directory-listing order is filesystem-dependent, so the list is sorted
/// by path — reruns produce identical transcript and CSV row order.
pub fn discover_images(image_dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(image_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("png") | Some("jpg") => files.push(path),
            _ => {}
        }
    }
    files.sort();
    Ok(files)
}

/// Create every configured output root up front. Failures here are
/// configuration errors and abort before any inference runs.
pub fn ensure_output_dirs(args: &Args) -> Result<(), BatchError> {
    for dir in [args.overlay_dir(), args.text_dir(), args.csv_dir()]
        .into_iter()
        .flatten()
    {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Map every keypoint from model space back to source-image pixels.
/// Sentinel slots hold zero coordinates, which scaling leaves at zero.
fn rescale_poses(poses: &mut [PoseDetection], scale: (f32, f32)) {
    for pose in poses {
        for keypoint in &mut pose.keypoints {
            keypoint.position = keypoint.position.scaled(scale);
        }
    }
}
