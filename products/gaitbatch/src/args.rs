use clap::Parser;
use std::path::{Path, PathBuf};

/// Batch pose estimation over a directory of still images.
///
/// Runs every `.png`/`.jpg` file in `--image-dir` through the pose model
/// and writes overlay images, per-image keypoint dumps, and one aggregated
/// CSV of the six lower-body joints.
#[derive(Parser, Debug, Clone)]
#[command(name = "gaitbatch", version)]
pub struct Args {
    /// Model checkpoint variant id (50, 75, 100 or 101)
    #[arg(long, default_value_t = 101)]
    pub model: u32,

    /// Directory holding the converted model files
    #[arg(long, default_value = "./models")]
    pub model_dir: PathBuf,

    /// Image rescaling factor applied before inference
    #[arg(long, default_value_t = 1.0)]
    pub scale_factor: f32,

    /// Suppress the per-image stdout transcript
    #[arg(long)]
    pub notxt: bool,

    /// Directory of input frames
    #[arg(long, default_value = "./images")]
    pub image_dir: PathBuf,

    /// Accepted for compatibility with older invocations; the batch core
    /// reads still images only
    #[arg(long, default_value = "./video_dir")]
    pub video_dir: PathBuf,

    /// Overlay image output directory (empty string disables overlays)
    #[arg(long, default_value = "./output")]
    pub output_dir: String,

    /// Per-image text dump directory (empty string disables dumps)
    #[arg(long, default_value = "./outputcsv")]
    pub output_csv_dir: String,

    /// Directory for the aggregated joint CSV (empty string disables it)
    #[arg(long, default_value = "./outputVideo")]
    pub output_video: String,

    /// Base file name of the aggregated CSV
    #[arg(long, default_value = "test")]
    pub output_name: String,
}

impl Args {
    pub fn overlay_dir(&self) -> Option<&Path> {
        optional_dir(&self.output_dir)
    }

    pub fn text_dir(&self) -> Option<&Path> {
        optional_dir(&self.output_csv_dir)
    }

    pub fn csv_dir(&self) -> Option<&Path> {
        optional_dir(&self.output_video)
    }
}

fn optional_dir(value: &str) -> Option<&Path> {
    if value.is_empty() {
        None
    } else {
        Some(Path::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_disables_output() {
        let args = Args::parse_from(["gaitbatch", "--output-dir", ""]);
        assert!(args.overlay_dir().is_none());
        assert_eq!(args.text_dir(), Some(Path::new("./outputcsv")));
        assert_eq!(args.csv_dir(), Some(Path::new("./outputVideo")));
    }

    #[test]
    fn test_defaults_mirror_reference_tool() {
        let args = Args::parse_from(["gaitbatch"]);
        assert_eq!(args.model, 101);
        assert_eq!(args.scale_factor, 1.0);
        assert!(!args.notxt);
        assert_eq!(args.image_dir, PathBuf::from("./images"));
        assert_eq!(args.output_name, "test");
    }
}
