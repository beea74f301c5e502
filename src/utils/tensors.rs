use burn::tensor::{backend::Backend, Data, ElementConversion, Shape, Tensor};

use crate::features::FeatureVector;

/// Stack feature vectors into a `[rows, dim]` float tensor, one row per vector
pub fn stack_rows<B: Backend>(
    rows: &[FeatureVector],
    dim: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    let batch_size = rows.len();

    let values = rows
        .iter()
        .flat_map(|row| row.as_slice().iter().copied())
        .map(|value| value.elem())
        .collect::<Vec<B::FloatElem>>();

    Tensor::from_data(
        Data::<B::FloatElem, 2>::new(values, Shape::new([batch_size, dim])),
        device,
    )
}

/// A `[len, 1]` column tensor
pub fn column<B: Backend>(values: &[f32], device: &B::Device) -> Tensor<B, 2> {
    let len = values.len();

    let values = values
        .iter()
        .map(|&value| value.elem())
        .collect::<Vec<B::FloatElem>>();

    Tensor::from_data(
        Data::<B::FloatElem, 2>::new(values, Shape::new([len, 1])),
        device,
    )
}

/// Flatten a float tensor back into `f32` values, row-major
pub fn to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Vec<f32> {
    tensor.into_data().convert::<f32>().value
}
