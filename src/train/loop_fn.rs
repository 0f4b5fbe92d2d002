use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::evaluate::accuracy;
use crate::train::train_config::TrainConfig;

/// A labelled set the loop scores after every epoch: `(inputs, labels)`.
pub type EvalSet<'a> = (&'a [Vec<f64>], &'a [Vec<f64>]);

/// Trains `network` for up to `config.epochs` epochs of per-sample SGD and
/// returns the statistics of every completed epoch.
///
/// Without shuffling this is exactly [`Network::train`], epoch by epoch.
/// All arguments are validated before the first update; a failed call
/// leaves the network untouched.
///
/// # Early termination
/// With `config.early_stop`, the loop stops after the first epoch whose
/// training loss does not beat the best so far, or, when `eval` is given,
/// whose eval accuracy does not beat the best so far. Improving epochs are
/// checkpointed when `config.checkpoint` is set.
pub fn train_loop(
    network: &mut Network,
    train_inputs: &[Vec<f64>],
    train_labels: &[Vec<f64>],
    eval: Option<EvalSet<'_>>,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    let optimizer = config.validate()?;
    network.check_dataset(train_inputs, train_labels)?;
    if let Some((inputs, labels)) = eval {
        network.check_dataset(inputs, labels)?;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<usize> = (0..train_inputs.len()).collect();

    let mut history = Vec::with_capacity(config.epochs);
    let mut best_loss = f64::INFINITY;
    let mut best_accuracy = f64::NEG_INFINITY;

    info!(
        epochs = config.epochs,
        learning_rate = config.learning_rate,
        samples = train_inputs.len(),
        shuffle = config.shuffle,
        "starting training"
    );

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rng);
        }
        let train_loss = network.train_epoch(train_inputs, train_labels, &order, &optimizer);

        let eval_accuracy = match eval {
            Some((inputs, labels)) => Some(accuracy(network, inputs, labels)?),
            None => None,
        };
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let loss_improved = train_loss < best_loss;
        let accuracy_improved = eval_accuracy.map_or(true, |a| a > best_accuracy);
        let improved = loss_improved && accuracy_improved;
        best_loss = best_loss.min(train_loss);
        if let Some(a) = eval_accuracy {
            best_accuracy = best_accuracy.max(a);
        }

        let mut saved = false;
        if improved {
            if let Some(path) = config.checkpoint_path(epoch) {
                network.save_json(&path)?;
                saved = true;
            }
        }

        info!(
            epoch,
            total = config.epochs,
            train_loss,
            eval_accuracy = ?eval_accuracy,
            elapsed_ms,
            saved,
            "epoch complete"
        );

        history.push(EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            eval_accuracy,
            saved,
            elapsed_ms,
        });

        if config.early_stop && !improved {
            warn!(epoch, "no improvement, stopping early");
            break;
        }
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::loss_type::LossType;

    fn xor() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let inputs = vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ];
        let labels = vec![vec![1.0], vec![0.0], vec![1.0], vec![0.0]];
        (inputs, labels)
    }

    fn seeded(sizes: &[usize]) -> Network {
        Network::with_rng(sizes, LossType::Mse, &mut StdRng::seed_from_u64(21)).unwrap()
    }

    #[test]
    fn unshuffled_loop_matches_network_train() {
        let (x, y) = xor();
        let mut a = seeded(&[2, 3, 1]);
        let mut b = a.clone();

        let final_loss = a.train(&x, &y, 0.3, 25).unwrap();
        let history = train_loop(&mut b, &x, &y, None, &TrainConfig::new(25, 0.3)).unwrap();

        assert_eq!(history.len(), 25);
        assert_eq!(history.last().unwrap().train_loss, final_loss);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffled_runs_repeat_with_the_same_seed() {
        let (x, y) = xor();
        let cfg = TrainConfig::new(10, 0.3).shuffle(Some(99));
        let mut a = seeded(&[2, 3, 1]);
        let mut b = a.clone();
        train_loop(&mut a, &x, &y, None, &cfg).unwrap();
        train_loop(&mut b, &x, &y, None, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn eval_accuracy_is_reported_each_epoch() {
        let (x, y) = xor();
        let mut net = seeded(&[2, 3, 1]);
        let eval: EvalSet = (&x, &y);
        let history = train_loop(&mut net, &x, &y, Some(eval), &TrainConfig::new(3, 0.3)).unwrap();
        assert!(history.iter().all(|s| s.eval_accuracy.is_some()));
    }

    #[test]
    fn early_stop_halts_once_accuracy_stops_improving() {
        // Accuracy over four samples can only strictly improve five times.
        let (x, y) = xor();
        let mut net = seeded(&[2, 3, 1]);
        let eval: EvalSet = (&x, &y);
        let cfg = TrainConfig::new(1000, 0.3).early_stop(true);
        let history = train_loop(&mut net, &x, &y, Some(eval), &cfg).unwrap();
        assert!(history.len() <= 5);
        assert!(!history.is_empty());
    }

    #[test]
    fn checkpoints_improving_epochs() {
        let dir = tempfile::tempdir().unwrap();
        let (x, y) = xor();
        let mut net = seeded(&[2, 3, 1]);
        let cfg = TrainConfig::new(2, 0.3).checkpoint(dir.path().join("xor_{epoch}.json"));
        let history = train_loop(&mut net, &x, &y, None, &cfg).unwrap();

        assert!(history[0].saved);
        assert!(dir.path().join("xor_1.json").exists());
        let reloaded = Network::load_json(dir.path().join("xor_2.json"));
        assert_eq!(reloaded.is_ok(), history[1].saved);
    }

    #[test]
    fn rejects_bad_config_before_training() {
        let (x, y) = xor();
        let mut net = seeded(&[2, 3, 1]);
        let before = net.clone();
        assert!(train_loop(&mut net, &x, &y, None, &TrainConfig::new(0, 0.3)).is_err());
        let lopsided: EvalSet = (&x, &[]);
        assert!(train_loop(&mut net, &x, &y, Some(lopsided), &TrainConfig::new(1, 0.3)).is_err());
        assert_eq!(net, before);
    }
}
