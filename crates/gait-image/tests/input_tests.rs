use gait_base::Tensor;
use gait_image::{prepare_input, ImageError};

fn solid_image(height: usize, width: usize, value: u8) -> Tensor<u8> {
    Tensor::new(vec![height, width, 3], vec![value; height * width * 3]).unwrap()
}

#[test]
fn test_prepare_input_stride_aligned_size() {
    // 32 px at stride 16 snaps to 2 * 16 + 1 = 33
    let image = solid_image(32, 32, 0);
    let (input, output_scale) = prepare_input(&image, 1.0, 16).unwrap();

    assert_eq!(input.shape, vec![1, 33, 33, 3]);
    assert!((output_scale.0 - 32.0 / 33.0).abs() < 1e-6);
    assert!((output_scale.1 - 32.0 / 33.0).abs() < 1e-6);
}

#[test]
fn test_prepare_input_scale_factor() {
    // 64 px scaled by 0.5 -> 32 -> 33; output scale maps back to 64
    let image = solid_image(64, 64, 0);
    let (input, output_scale) = prepare_input(&image, 0.5, 16).unwrap();

    assert_eq!(input.shape, vec![1, 33, 33, 3]);
    assert!((output_scale.0 - 64.0 / 33.0).abs() < 1e-6);
    assert!((output_scale.1 - 64.0 / 33.0).abs() < 1e-6);
}

#[test]
fn test_prepare_input_minimum_one_cell() {
    // Tiny inputs still produce a stride + 1 tensor
    let image = solid_image(8, 8, 0);
    let (input, _) = prepare_input(&image, 1.0, 16).unwrap();
    assert_eq!(input.shape, vec![1, 17, 17, 3]);
}

#[test]
fn test_prepare_input_rectangular_scales_per_axis() {
    let image = solid_image(48, 96, 0);
    let (input, output_scale) = prepare_input(&image, 1.0, 16).unwrap();

    assert_eq!(input.shape, vec![1, 49, 97, 3]);
    assert!((output_scale.0 - 48.0 / 49.0).abs() < 1e-6);
    assert!((output_scale.1 - 96.0 / 97.0).abs() < 1e-6);
}

#[test]
fn test_prepare_input_normalization_range() {
    // 0 maps to -1.0, 255 maps to 1.0
    let black = solid_image(32, 32, 0);
    let (input, _) = prepare_input(&black, 1.0, 16).unwrap();
    assert!(input.data.iter().all(|&v| (v + 1.0).abs() < 1e-6));

    let white = solid_image(32, 32, 255);
    let (input, _) = prepare_input(&white, 1.0, 16).unwrap();
    assert!(input.data.iter().all(|&v| (v - 1.0).abs() < 1e-6));
}

#[test]
fn test_prepare_input_rejects_bad_shape() {
    let gray = Tensor::new(vec![8, 8, 1], vec![0u8; 64]).unwrap();
    let result = prepare_input(&gray, 1.0, 16);
    assert!(matches!(result, Err(ImageError::Decode(_))));
}
