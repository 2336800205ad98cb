//! Image file handling for the gait pipeline.
//!
//! Wraps the `image` crate to move between files on disk and `Tensor<u8>`
//! from `gait-base`. Decoded images use HWC layout `[height, width, 3]`,
//! RGB8. Model-input preparation lives in [`input`].

pub mod error;
pub mod input;

pub use error::ImageError;
pub use input::prepare_input;

use gait_base::Tensor;

/// Load an image file and decode it to an RGB8 tensor.
///
/// Any pixel format the `image` crate can decode is converted to RGB8;
/// the model consumes three channels and the overlay renderer writes them
/// back out, so nothing downstream wants higher precision.
///
/// # Errors
///
/// `ImageError::Io` if the file cannot be read, `ImageError::Decode` if the
/// bytes are not a decodable image.
pub fn load_rgb8(path: impl AsRef<std::path::Path>) -> Result<Tensor<u8>, ImageError> {
    let bytes = std::fs::read(path)?;
    let img = crates_image::load_from_memory(&bytes)?.to_rgb8();
    let (width, height) = img.dimensions();
    let shape = vec![height as usize, width as usize, 3];
    Ok(Tensor::new(shape, img.into_raw())?)
}

/// Encode an RGB8 tensor to disk, format chosen by the path extension.
///
/// # Errors
///
/// `ImageError::Encode` if the tensor is not HWC RGB8 or the encoder fails.
pub fn save_rgb8(
    path: impl AsRef<std::path::Path>,
    image: &Tensor<u8>,
) -> Result<(), ImageError> {
    if image.ndim() != 3 || image.shape[2] != 3 {
        return Err(ImageError::Encode(format!(
            "expected [H, W, 3] tensor, got {:?}",
            image.shape
        )));
    }
    let (height, width) = (image.shape[0], image.shape[1]);

    crates_image::save_buffer(
        path,
        &image.data,
        width as u32,
        height as u32,
        crates_image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| ImageError::Encode(e.to_string()))
}
