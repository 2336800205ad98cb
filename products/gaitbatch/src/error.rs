use std::fmt;

#[derive(Debug)]
pub enum BatchError {
    Image(gait_image::ImageError),
    Infer(gait_infer::InferError),
    Io(String),
    Csv(String),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Image(err) => write!(f, "image error: {err}"),
            BatchError::Infer(err) => write!(f, "inference error: {err}"),
            BatchError::Io(msg) => write!(f, "io error: {msg}"),
            BatchError::Csv(msg) => write!(f, "csv error: {msg}"),
        }
    }
}

impl std::error::Error for BatchError {}

impl From<gait_image::ImageError> for BatchError {
    fn from(err: gait_image::ImageError) -> Self {
        BatchError::Image(err)
    }
}

impl From<gait_infer::InferError> for BatchError {
    fn from(err: gait_infer::InferError) -> Self {
        BatchError::Infer(err)
    }
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        BatchError::Io(err.to_string())
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        BatchError::Csv(err.to_string())
    }
}
