use clap::Parser;

use gait_base::log_fatal;
use gait_infer::{Device, ModelSource, ModelVariant, OnnxBackend, PosenetEstimator};
use gaitbatch::detector::PosenetDetector;
use gaitbatch::{pipeline, Args};

fn main() {
    gait_base::init_stdout_logger();

    let args = Args::parse();

    let variant = match ModelVariant::from_id(args.model) {
        Ok(variant) => variant,
        Err(error) => log_fatal!("{}", error),
    };

    let model_path = args.model_dir.join(variant.file_name());
    log::info!("loading pose model {}", model_path.display());

    let backend = OnnxBackend::new(Device::Cpu);
    let estimator = match PosenetEstimator::new(variant, ModelSource::File(model_path), &backend) {
        Ok(estimator) => estimator,
        Err(error) => log_fatal!("failed to load model: {}", error),
    };

    let mut detector = PosenetDetector::new(estimator, args.scale_factor);

    match pipeline::run(&args, &mut detector) {
        Ok(summary) => log::info!(
            "processed {} images in {:.2}s",
            summary.files_processed,
            summary.elapsed_seconds
        ),
        Err(error) => log_fatal!("batch run failed: {}", error),
    }
}
