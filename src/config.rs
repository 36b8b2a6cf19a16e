use burn::prelude::*;

/// Hyper-parameters shared by every training variant.
#[derive(Config, Debug)]
pub struct TrainingConfig {
    #[config(default = 2000)]
    pub iterations: usize,
    #[config(default = 0.2)]
    pub learning_rate: f64,
    #[config(default = 42)]
    pub seed: u64,
    #[config(default = 4)]
    pub hidden_size: usize,
    /// Final MSE a run must reach to count as converged
    #[config(default = 0.01)]
    pub loss_threshold: f32,
    /// Max distance from 1.0 for a prediction to read as `true`
    #[config(default = 0.1)]
    pub prediction_tolerance: f32,
}
