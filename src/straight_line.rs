use burn::prelude::*;
use burn::tensor::activation::sigmoid;

use crate::config::TrainingConfig;
use crate::data::XorBatch;
use crate::init::init_parameters;
use crate::report::{TrainingReport, mean_squared};

/// Train XOR with the four parameters held as loop locals
pub fn train_straight_line<B: Backend>(
    config: &TrainingConfig,
    device: &B::Device,
) -> TrainingReport {
    let lr = config.learning_rate;
    let (mut w1, mut w2, mut b1, mut b2) =
        init_parameters::<B>(config.seed, config.hidden_size, device);
    let XorBatch { inputs: x, targets: y } = XorBatch::<B>::new(device);
    let mut report = TrainingReport::with_capacity(config.iterations);

    for i in 0..config.iterations {
        // Forward pass
        let z1 = x.clone().matmul(w1.clone()) + b1.clone();
        let h1 = sigmoid(z1);
        let z2 = h1.clone().matmul(w2.clone()) + b2.clone();
        let pred = sigmoid(z2);

        // Backward pass
        let dz2 = pred - y.clone();
        let dw2 = h1.clone().transpose().matmul(dz2.clone());
        let db2 = dz2.clone().sum_dim(0);
        let dz1 = dz2.clone().matmul(w2.clone().transpose())
            * h1.clone()
            * h1.neg().add_scalar(1.0);
        let dw1 = x.clone().transpose().matmul(dz1.clone());
        let db1 = dz1.sum_dim(0);

        // Gradient descent
        w1 = w1 - dw1.mul_scalar(lr);
        b1 = b1 - db1.mul_scalar(lr);
        w2 = w2 - dw2.mul_scalar(lr);
        b2 = b2 - db2.mul_scalar(lr);

        // Update current loss
        let loss = mean_squared(dz2);
        report.record(i, loss);
    }

    log::info!(
        "straight-line: {} iterations, final loss {}",
        config.iterations,
        report.final_loss()
    );
    report
}
