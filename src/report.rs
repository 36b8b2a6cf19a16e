use burn::prelude::*;
use burn::tensor::ElementConversion;

/// Mean of the squared entries of `error`, over both axes
pub fn mean_squared<B: Backend>(error: Tensor<B, 2>) -> f32 {
    (error.clone() * error).mean().into_scalar().elem()
}

/// Loss history of one training run, one entry per iteration.
#[derive(Clone, Debug, Default)]
pub struct TrainingReport {
    pub losses: Vec<f32>,
}

impl TrainingReport {
    pub fn with_capacity(iterations: usize) -> Self {
        Self {
            losses: Vec::with_capacity(iterations),
        }
    }

    pub fn record(&mut self, iteration: usize, loss: f32) {
        if iteration % 100 == 0 {
            log::debug!("iteration: {}, loss: {}", iteration, loss);
        }
        self.losses.push(loss);
    }

    /// Infinite until the first iteration has been recorded
    pub fn final_loss(&self) -> f32 {
        self.losses.last().copied().unwrap_or(f32::INFINITY)
    }

    pub fn initial_loss(&self) -> f32 {
        self.losses.first().copied().unwrap_or(f32::INFINITY)
    }

    pub fn has_converged(&self, threshold: f32) -> bool {
        self.final_loss() < threshold
    }

    /// Mean loss of each full `width`-sized window from `start` onwards
    pub fn window_means(&self, start: usize, width: usize) -> Vec<f32> {
        if width == 0 || start >= self.losses.len() {
            return Vec::new();
        }
        self.losses[start..]
            .chunks_exact(width)
            .map(|w| w.iter().sum::<f32>() / width as f32)
            .collect()
    }
}
