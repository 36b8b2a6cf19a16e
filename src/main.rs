mod autodiff;
mod classifier;
mod config;
mod data;
mod init;
mod report;
mod straight_line;

use burn::backend::Autodiff;
use burn::config::ConfigError;
use burn::module::AutodiffModule;
use burn::prelude::*;
use config::TrainingConfig;

#[cfg(not(any(feature = "metal", feature = "wgpu")))]
type Compute = burn_ndarray::NdArray;

#[cfg(feature = "metal")]
type Compute = burn::backend::Metal;

#[cfg(all(feature = "wgpu", not(feature = "metal")))]
type Compute = burn::backend::Wgpu;

/// Train every variant on `B`, returning whether all of them converged
pub fn run<B: Backend>(config: &TrainingConfig, device: &B::Device) -> bool {
    let threshold = config.loss_threshold;
    let tolerance = config.prediction_tolerance;

    let straight = straight_line::train_straight_line::<B>(config, device);
    let (classifier, fitted) = classifier::train_xor::<B>(config, device);
    let (model, traced) = autodiff::train_autodiff::<Autodiff<B>>(config, device);
    let model = model.valid();

    let mut ok = true;
    for (name, report) in [
        ("straight-line", &straight),
        ("classifier", &fitted),
        ("autodiff", &traced),
    ] {
        let converged = report.has_converged(threshold);
        println!(
            "{}: initial loss {}, final loss {}, converged: {}",
            name,
            report.initial_loss(),
            report.final_loss(),
            converged
        );
        log::debug!("{} loss per 500 iterations: {:?}", name, report.window_means(0, 500));
        ok &= converged;
    }

    let batch = data::XorBatch::<B>::new(device);
    let loss = classifier.loss(classifier.prediction(batch.inputs), batch.targets);
    log::info!("classifier loss on the XOR batch after training: {}", loss);

    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        let expected = a ^ b;
        let predicted = classifier.predict(a, b);
        let via_autodiff = model.predict(a, b, tolerance);
        println!(
            "{} xor {} -> classifier {}, autodiff {}",
            a, b, predicted, via_autodiff
        );
        if predicted != expected || via_autodiff != expected {
            log::error!("wrong prediction for ({}, {})", a, b);
            ok = false;
        }
    }
    ok
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();
    let config = match std::env::args().nth(1) {
        Some(path) => TrainingConfig::load(path)?,
        None => TrainingConfig::new(),
    };
    log::info!("{}", config);

    let device = Default::default();
    if !run::<Compute>(&config, &device) {
        log::error!("training did not converge");
        std::process::exit(1);
    }
    Ok(())
}
