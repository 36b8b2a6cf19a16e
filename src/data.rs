use burn::prelude::*;

pub const INPUTS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
pub const TARGETS: [[f32; 1]; 4] = [[0.0], [1.0], [1.0], [0.0]];

/// The four XOR examples as a single batch
#[derive(Clone, Debug)]
pub struct XorBatch<B: Backend> {
    pub inputs: Tensor<B, 2>,
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> XorBatch<B> {
    pub fn new(device: &B::Device) -> Self {
        Self {
            inputs: Tensor::from_data(INPUTS, device),
            targets: Tensor::from_data(TARGETS, device),
        }
    }
}

/// Encode a pair of booleans as a `[1, 2]` input row
pub fn encode_pair<B: Backend>(a: bool, b: bool, device: &B::Device) -> Tensor<B, 2> {
    let as_float = |v: bool| -> f32 { if v { 1.0 } else { 0.0 } };
    Tensor::from_data([[as_float(a), as_float(b)]], device)
}
