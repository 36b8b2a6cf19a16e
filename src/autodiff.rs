use burn::module::Param;
use burn::optim::{GradientsParams, Optimizer, SgdConfig};
use burn::prelude::*;
use burn::tensor::ElementConversion;
use burn::tensor::activation::{log_sigmoid, sigmoid};
use burn::tensor::backend::AutodiffBackend;

use crate::classifier::ManualGradients;
use crate::config::TrainingConfig;
use crate::data::{XorBatch, encode_pair};
use crate::init::init_parameters;
use crate::report::{TrainingReport, mean_squared};

/// The XOR network as a burn module, trained through the runtime's autodiff
#[derive(Module, Debug)]
pub struct AutodiffMlp<B: Backend> {
    w1: Param<Tensor<B, 2>>,
    w2: Param<Tensor<B, 2>>,
    b1: Param<Tensor<B, 2>>,
    b2: Param<Tensor<B, 2>>,
}

impl<B: Backend> AutodiffMlp<B> {
    pub fn new(config: &TrainingConfig, device: &B::Device) -> Self {
        let (w1, w2, b1, b2) = init_parameters::<B>(config.seed, config.hidden_size, device);
        Self {
            w1: Param::from_tensor(w1.require_grad()),
            w2: Param::from_tensor(w2.require_grad()),
            b1: Param::from_tensor(b1.require_grad()),
            b2: Param::from_tensor(b2.require_grad()),
        }
    }

    /// Output pre-activation `z2`
    pub fn logits(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let h1 = sigmoid(x.matmul(self.w1.val()) + self.b1.val());
        h1.matmul(self.w2.val()) + self.b2.val()
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.logits(x))
    }

    pub fn predict(&self, a: bool, b: bool, tolerance: f32) -> bool {
        let input = encode_pair::<B>(a, b, &self.w1.device());
        let pred: f32 = self.forward(input).into_scalar().elem();
        (pred - 1.0).abs() < tolerance
    }
}

/// Binary cross-entropy on logits, summed over the batch.
///
/// `d/dz2` of this objective is `sigmoid(z2) - y`, the same output error the
/// hand-written backward pass starts from.
pub fn objective<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let positive = targets.clone() * log_sigmoid(logits.clone());
    let negative = targets.neg().add_scalar(1.0) * log_sigmoid(logits.neg());
    (positive + negative).neg().sum()
}

impl<B: AutodiffBackend> AutodiffMlp<B> {
    /// Parameter gradients as computed by the autodiff backend
    pub fn gradients(
        &self,
        x: Tensor<B, 2>,
        y: Tensor<B, 2>,
    ) -> Option<ManualGradients<B::InnerBackend>> {
        let logits = self.logits(x);
        let output_error = sigmoid(logits.clone().inner()) - y.clone().inner();
        let grads = objective(logits, y).backward();
        Some(ManualGradients {
            w1: self.w1.grad(&grads)?,
            w2: self.w2.grad(&grads)?,
            b1: self.b1.grad(&grads)?,
            b2: self.b2.grad(&grads)?,
            output_error,
        })
    }
}

/// Fit the module to XOR with plain SGD
pub fn train_autodiff<B: AutodiffBackend>(
    config: &TrainingConfig,
    device: &B::Device,
) -> (AutodiffMlp<B>, TrainingReport) {
    let batch = XorBatch::<B>::new(device);
    let mut model = AutodiffMlp::<B>::new(config, device);
    let mut optimizer = SgdConfig::new().init::<B, AutodiffMlp<B>>();
    let mut report = TrainingReport::with_capacity(config.iterations);

    for i in 0..config.iterations {
        let logits = model.logits(batch.inputs.clone());
        let pred = sigmoid(logits.clone().detach());
        let loss = mean_squared(pred - batch.targets.clone());

        let grads = objective(logits, batch.targets.clone()).backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optimizer.step(config.learning_rate, model, grads);
        report.record(i, loss);
    }

    log::info!(
        "autodiff: {} iterations, final loss {}",
        config.iterations,
        report.final_loss()
    );
    (model, report)
}
