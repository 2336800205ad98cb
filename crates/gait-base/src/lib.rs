pub mod logging;
pub mod tensor;

pub use logging::{init_stdout_logger, StdoutLogger};
pub use tensor::{Tensor, TensorError};

// Re-export log so downstream crates share one facade version
pub use log;
