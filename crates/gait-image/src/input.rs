use gait_base::Tensor;

use crate::ImageError;

/// Prepare a decoded image for pose model inference.
///
/// The model accepts only resolutions of the form `n * stride + 1`, so the
/// requested scale factor is snapped down to the nearest valid size per
/// axis. Pixels are resampled bilinearly and normalized from `[0, 255]` to
/// `[-1.0, 1.0]`.
///
/// Returns the NHWC input tensor `[1, H', W', 3]` and the per-axis output
/// scale `(y, x)` that maps model-space coordinates back to pixels of the
/// original image (`original_size / resized_size`).
///
/// # Errors
///
/// `ImageError::Decode` if the tensor is not HWC RGB8.
pub fn prepare_input(
    image: &Tensor<u8>,
    scale_factor: f32,
    output_stride: usize,
) -> Result<(Tensor<f32>, (f32, f32)), ImageError> {
    if image.ndim() != 3 || image.shape[2] != 3 {
        return Err(ImageError::Decode(format!(
            "expected [H, W, 3] tensor, got {:?}",
            image.shape
        )));
    }
    let (height, width) = (image.shape[0], image.shape[1]);

    let target_height = valid_resolution(height as f32 * scale_factor, output_stride);
    let target_width = valid_resolution(width as f32 * scale_factor, output_stride);

    let output_scale = (
        height as f32 / target_height as f32,
        width as f32 / target_width as f32,
    );

    let mut data = vec![0.0f32; target_height * target_width * 3];
    for out_y in 0..target_height {
        for out_x in 0..target_width {
            let rgb = sample_bilinear(image, width, height, out_x, out_y, target_width, target_height);
            let dst = (out_y * target_width + out_x) * 3;
            for ch in 0..3 {
                data[dst + ch] = rgb[ch] * (2.0 / 255.0) - 1.0;
            }
        }
    }

    let tensor = Tensor::new(vec![1, target_height, target_width, 3], data)?;
    Ok((tensor, output_scale))
}

/// Largest `n * stride + 1` size not exceeding the scaled dimension
/// (minimum one cell).
fn valid_resolution(scaled: f32, output_stride: usize) -> usize {
    let cells = (scaled as usize) / output_stride;
    cells.max(1) * output_stride + 1
}

/// Bilinear sample at the source position corresponding to output pixel
/// `(out_x, out_y)`, using pixel-center alignment.
fn sample_bilinear(
    image: &Tensor<u8>,
    width: usize,
    height: usize,
    out_x: usize,
    out_y: usize,
    target_width: usize,
    target_height: usize,
) -> [f32; 3] {
    let src_x = ((out_x as f32 + 0.5) * width as f32 / target_width as f32 - 0.5)
        .clamp(0.0, (width - 1) as f32);
    let src_y = ((out_y as f32 + 0.5) * height as f32 / target_height as f32 - 0.5)
        .clamp(0.0, (height - 1) as f32);

    let x0 = src_x.floor() as usize;
    let y0 = src_y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = src_x - x0 as f32;
    let fy = src_y - y0 as f32;

    let mut rgb = [0.0f32; 3];
    for ch in 0..3 {
        let p00 = image.at3(y0, x0, ch) as f32;
        let p01 = image.at3(y0, x1, ch) as f32;
        let p10 = image.at3(y1, x0, ch) as f32;
        let p11 = image.at3(y1, x1, ch) as f32;

        let top = p00 + (p01 - p00) * fx;
        let bottom = p10 + (p11 - p10) * fx;
        rgb[ch] = top + (bottom - top) * fy;
    }
    rgb
}
