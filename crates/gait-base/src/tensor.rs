use std::fmt;

#[derive(Debug, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
        }
    }
}

impl std::error::Error for TensorError {}

/// Dense row-major tensor. Images use HWC layout `[height, width, channels]`,
/// model outputs keep whatever layout the graph produced.
#[derive(Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T: fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<T> Tensor<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let product = checked_product(&shape)?;
        if product != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected: product,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Copy> Tensor<T> {
    /// Value at `[i, j, k]` of a rank-3 tensor.
    ///
    /// Callers validate rank and bounds up front; heatmap and offset grids
    /// are indexed this way in the hot decode loop.
    #[inline]
    pub fn at3(&self, i: usize, j: usize, k: usize) -> T {
        let (d1, d2) = (self.shape[1], self.shape[2]);
        self.data[(i * d1 + j) * d2 + k]
    }
}

impl<T: Default + Clone> Tensor<T> {
    pub fn zeros(shape: Vec<usize>) -> Result<Self, TensorError> {
        let product = checked_product(&shape)?;
        Ok(Self {
            shape,
            data: vec![T::default(); product],
        })
    }
}

fn checked_product(shape: &[usize]) -> Result<usize, TensorError> {
    let mut product: usize = 1;
    for &dim in shape {
        product = product.checked_mul(dim).ok_or(TensorError::ShapeOverflow)?;
    }
    Ok(product)
}
