use burn::prelude::*;
use burn::tensor::ElementConversion;
use burn::tensor::activation::sigmoid;

use crate::config::TrainingConfig;
use crate::data::{XorBatch, encode_pair};
use crate::init::init_parameters;
use crate::report::{TrainingReport, mean_squared};

/// Hand-derived gradients of every parameter, plus the output error `pred - y`
#[derive(Clone, Debug)]
pub struct ManualGradients<B: Backend> {
    pub w1: Tensor<B, 2>,
    pub w2: Tensor<B, 2>,
    pub b1: Tensor<B, 2>,
    pub b2: Tensor<B, 2>,
    pub output_error: Tensor<B, 2>,
}

/// Two-layer sigmoid classifier with all parameters kept together
#[derive(Clone, Debug)]
pub struct MlpClassifier<B: Backend> {
    pub w1: Tensor<B, 2>,
    pub w2: Tensor<B, 2>,
    pub b1: Tensor<B, 2>,
    pub b2: Tensor<B, 2>,
    tolerance: f32,
}

impl<B: Backend> MlpClassifier<B> {
    pub fn new(config: &TrainingConfig, device: &B::Device) -> Self {
        let (w1, w2, b1, b2) = init_parameters::<B>(config.seed, config.hidden_size, device);
        Self {
            w1,
            w2,
            b1,
            b2,
            tolerance: config.prediction_tolerance,
        }
    }

    pub fn prediction(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let o1 = sigmoid(x.matmul(self.w1.clone()) + self.b1.clone());
        sigmoid(o1.matmul(self.w2.clone()) + self.b2.clone())
    }

    /// Classify a single boolean pair; `true` when the output is close to 1
    pub fn predict(&self, a: bool, b: bool) -> bool {
        let input = encode_pair::<B>(a, b, &self.w1.device());
        let pred: f32 = self.prediction(input).into_scalar().elem();
        (pred - 1.0).abs() < self.tolerance
    }

    /// Mean squared error over both axes
    pub fn loss(&self, prediction: Tensor<B, 2>, expected: Tensor<B, 2>) -> f32 {
        mean_squared(prediction - expected)
    }

    pub fn gradients(&self, x: Tensor<B, 2>, y: Tensor<B, 2>) -> ManualGradients<B> {
        let z1 = x.clone().matmul(self.w1.clone()) + self.b1.clone();
        let h1 = sigmoid(z1);
        let z2 = h1.clone().matmul(self.w2.clone()) + self.b2.clone();
        let pred = sigmoid(z2);

        let dz2 = pred - y;
        let dw2 = h1.clone().transpose().matmul(dz2.clone());
        let db2 = dz2.clone().sum_dim(0);
        let dz1 = dz2.clone().matmul(self.w2.clone().transpose())
            * h1.clone()
            * h1.neg().add_scalar(1.0);
        let dw1 = x.transpose().matmul(dz1.clone());
        let db1 = dz1.sum_dim(0);

        ManualGradients {
            w1: dw1,
            w2: dw2,
            b1: db1,
            b2: db2,
            output_error: dz2,
        }
    }

    fn apply(&mut self, grads: ManualGradients<B>, learning_rate: f64) {
        self.w1 = self.w1.clone() - grads.w1.mul_scalar(learning_rate);
        self.b1 = self.b1.clone() - grads.b1.mul_scalar(learning_rate);
        self.w2 = self.w2.clone() - grads.w2.mul_scalar(learning_rate);
        self.b2 = self.b2.clone() - grads.b2.mul_scalar(learning_rate);
    }

    /// Plain gradient descent for a fixed number of iterations
    pub fn train(
        &mut self,
        x: Tensor<B, 2>,
        y: Tensor<B, 2>,
        iterations: usize,
        learning_rate: f64,
    ) -> TrainingReport {
        let mut report = TrainingReport::with_capacity(iterations);
        for i in 0..iterations {
            let grads = self.gradients(x.clone(), y.clone());
            // Loss of the forward pass these gradients came from
            let loss = mean_squared(grads.output_error.clone());
            self.apply(grads, learning_rate);
            report.record(i, loss);
        }
        report
    }
}

/// Build a classifier from `config` and fit it to XOR
pub fn train_xor<B: Backend>(
    config: &TrainingConfig,
    device: &B::Device,
) -> (MlpClassifier<B>, TrainingReport) {
    let batch = XorBatch::<B>::new(device);
    let mut classifier = MlpClassifier::<B>::new(config, device);
    let report = classifier.train(
        batch.inputs,
        batch.targets,
        config.iterations,
        config.learning_rate,
    );
    log::info!(
        "classifier: {} iterations, final loss {}",
        config.iterations,
        report.final_loss()
    );
    (classifier, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::{NdArray, NdArrayDevice};

    type B = NdArray<f32, i64, i8>;

    #[test]
    fn test_xor_classifier_training() {
        let device = NdArrayDevice::default();
        let config = TrainingConfig::new();
        let (classifier, report) = train_xor::<B>(&config, &device);
        assert_eq!(report.losses.len(), 2000);
        assert!(
            report.has_converged(config.loss_threshold),
            "final loss {} not below {}",
            report.final_loss(),
            config.loss_threshold
        );
        assert!(classifier.predict(true, false));
    }

    #[test]
    fn test_trained_truth_table() {
        let device = NdArrayDevice::default();
        let (classifier, _) = train_xor::<B>(&TrainingConfig::new(), &device);
        assert!(classifier.predict(false, true));
        assert!(!classifier.predict(true, true));
        assert!(!classifier.predict(false, false));

        let batch = XorBatch::<B>::new(&device);
        let pred: Vec<f32> = classifier
            .prediction(batch.inputs.clone())
            .to_data()
            .to_vec()
            .unwrap();
        let expected: Vec<f32> = batch.targets.clone().to_data().to_vec().unwrap();
        for (p, e) in pred.iter().zip(expected.iter()) {
            assert!((p - e).abs() < 0.1, "prediction {} too far from {}", p, e);
        }
        assert!(classifier.loss(classifier.prediction(batch.inputs), batch.targets) < 0.01);
    }

    #[test]
    fn test_untrained_loss_is_high() {
        let device = NdArrayDevice::default();
        let classifier = MlpClassifier::<B>::new(&TrainingConfig::new(), &device);
        let batch = XorBatch::<B>::new(&device);
        let loss = classifier.loss(classifier.prediction(batch.inputs), batch.targets);
        assert!(loss > 0.1, "untrained loss {} unexpectedly low", loss);
    }

    #[test]
    fn test_gradient_shapes() {
        let device = NdArrayDevice::default();
        let config = TrainingConfig::new().with_hidden_size(5);
        let classifier = MlpClassifier::<B>::new(&config, &device);
        let batch = XorBatch::<B>::new(&device);
        let grads = classifier.gradients(batch.inputs, batch.targets);
        assert_eq!(grads.w1.dims(), [2, 5]);
        assert_eq!(grads.w2.dims(), [5, 1]);
        assert_eq!(grads.b1.dims(), [1, 5]);
        assert_eq!(grads.b2.dims(), [1, 1]);
        assert_eq!(grads.output_error.dims(), [4, 1]);
    }

    #[test]
    fn test_loss_decreases_in_the_long_run() {
        let device = NdArrayDevice::default();
        let (_, report) = train_xor::<B>(&TrainingConfig::new(), &device);
        assert!(report.final_loss() < report.initial_loss());
        let means = report.window_means(500, 250);
        assert_eq!(means.len(), 6);
        for pair in means.windows(2) {
            assert!(pair[1] < pair[0], "window means not decreasing: {:?}", means);
        }
    }
}
