use burn::prelude::*;
use burn::tensor::TensorData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded source of initial parameters.
///
/// Values are drawn on the host and uploaded, so a given seed yields the same
/// starting point on every backend.
pub struct Initializer {
    rng: StdRng,
}

impl Initializer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Row-major draws from `[0, 1)`
    pub fn uniform<B: Backend>(&mut self, shape: [usize; 2], device: &B::Device) -> Tensor<B, 2> {
        let values: Vec<f32> = (0..shape[0] * shape[1])
            .map(|_| self.rng.random_range(0.0..1.0))
            .collect();
        Tensor::from_data(TensorData::new(values, shape), device)
    }
}

/// Initial `(w1, w2, b1, b2)` for a `2 -> hidden -> 1` network
pub fn init_parameters<B: Backend>(
    seed: u64,
    hidden: usize,
    device: &B::Device,
) -> (Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 2>) {
    let mut init = Initializer::new(seed);
    let w1 = init.uniform::<B>([2, hidden], device);
    let w2 = init.uniform::<B>([hidden, 1], device);
    let b1 = Tensor::zeros([1, hidden], device);
    let b2 = Tensor::zeros([1, 1], device);
    (w1, w2, b1, b2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::{NdArray, NdArrayDevice};

    type B = NdArray<f32, i64, i8>;

    #[test]
    fn test_uniform_range() {
        let device = NdArrayDevice::default();
        let mut init = Initializer::new(42);
        let t = init.uniform::<B>([16, 16], &device);
        let data: Vec<f32> = t.to_data().to_vec().unwrap();
        assert_eq!(data.len(), 256);
        assert!(data.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_same_seed_same_parameters() {
        let device = NdArrayDevice::default();
        let (a, _, _, _) = init_parameters::<B>(42, 4, &device);
        let (b, _, _, _) = init_parameters::<B>(42, 4, &device);
        let (c, _, _, _) = init_parameters::<B>(43, 4, &device);
        let a: Vec<f32> = a.to_data().to_vec().unwrap();
        let b: Vec<f32> = b.to_data().to_vec().unwrap();
        let c: Vec<f32> = c.to_data().to_vec().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_parameter_shapes() {
        let device = NdArrayDevice::default();
        let (w1, w2, b1, b2) = init_parameters::<B>(42, 6, &device);
        assert_eq!(w1.dims(), [2, 6]);
        assert_eq!(w2.dims(), [6, 1]);
        assert_eq!(b1.dims(), [1, 6]);
        assert_eq!(b2.dims(), [1, 1]);
        let zeros: Vec<f32> = b1.to_data().to_vec().unwrap();
        assert!(zeros.iter().all(|v| *v == 0.0));
    }
}
