use std::path::{Path, PathBuf};

use gait_base::Tensor;
use gait_infer::{PoseDetection, PART_NAMES};

use crate::draw::draw_poses;
use crate::error::BatchError;

/// Score gates for overlay rendering, matching the acceptance threshold
/// the decoder runs with
pub const MIN_POSE_SCORE: f32 = 0.25;
pub const MIN_PART_SCORE: f32 = 0.25;

/// Where (and whether) the per-image artifacts go
pub struct ExportConfig {
    pub overlay_dir: Option<PathBuf>,
    pub text_dir: Option<PathBuf>,
    pub emit_text: bool,
}

/// Write one image's artifacts: annotated overlay, keypoint text dump,
/// stdout transcript. Each output is independent and side-effect-only;
/// any I/O failure propagates.
pub fn export_frame(
    config: &ExportConfig,
    image_dir: &Path,
    path: &Path,
    poses: &[PoseDetection],
    draw_image: &mut Tensor<u8>,
) -> Result<(), BatchError> {
    let relative = relative_to(image_dir, path);

    if let Some(overlay_dir) = &config.overlay_dir {
        draw_poses(draw_image, poses, MIN_POSE_SCORE, MIN_PART_SCORE);
        gait_image::save_rgb8(overlay_dir.join(&relative), draw_image)?;
    }

    if let Some(text_dir) = &config.text_dir {
        let out_path = text_dir.join(relative.with_extension("txt"));
        std::fs::write(out_path, transcript(path, poses))?;
    }

    if config.emit_text {
        println!();
        print!("{}", transcript(path, poses));
    }

    Ok(())
}

/// Input path relative to the discovery root, so subdirectory structure
/// is mirrored under the output roots. Falls back to the bare file name
/// for paths outside the root.
fn relative_to(image_dir: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(image_dir) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => PathBuf::from(path.file_name().unwrap_or(path.as_os_str())),
    }
}

/// Render the transcript shared by the text file and stdout: a header
/// naming the source image, then one block per accepted detection,
/// stopping at the first sentinel.
fn transcript(path: &Path, poses: &[PoseDetection]) -> String {
    let mut out = format!("Results for image: {}\n", path.display());

    for (index, pose) in poses.iter().enumerate() {
        if pose.is_sentinel() {
            break;
        }
        out.push_str(&format!("Pose #{}, score = {:.6}\n", index, pose.score));
        for (part, keypoint) in pose.keypoints.iter().enumerate() {
            out.push_str(&format!(
                "Keypoint {}, score = {:.6}, coord = {}\n",
                PART_NAMES[part], keypoint.score, keypoint.position
            ));
        }
    }

    out
}
