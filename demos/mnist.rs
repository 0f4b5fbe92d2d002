/// MNIST digit classification example for ferrite-fc.
///
/// Architecture: 784 → 200 (Sigmoid) → 80 (Sigmoid) → 10 (Sigmoid)
/// Loss:         MSE
/// Optimizer:    per-sample SGD, lr = 0.01
/// Epochs:       up to 10, stopping once test accuracy stops improving
///
/// Run with:
///   cargo run --example mnist --release
///
/// Data files must be present at demos/mnist_data/ (IDX binary format).

use ferrite_fc::data::load_idx_pair;
use ferrite_fc::math::vector::argmax;
use ferrite_fc::train::EvalSet;
use ferrite_fc::{train_loop, Network, TrainConfig};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // --- Paths (relative to project root; cargo run --example runs from there) ---
    let train_images_path = "demos/mnist_data/train-images-idx3-ubyte";
    let train_labels_path = "demos/mnist_data/train-labels-idx1-ubyte";
    let test_images_path  = "demos/mnist_data/t10k-images-idx3-ubyte";
    let test_labels_path  = "demos/mnist_data/t10k-labels-idx1-ubyte";

    println!("Loading MNIST data...");
    let train = load_idx_pair(train_images_path, train_labels_path, 10)?;
    let test  = load_idx_pair(test_images_path, test_labels_path, 10)?;
    println!("  Training set: {} samples", train.len());
    println!("  Test set:     {} samples", test.len());

    let mut network = Network::new(&[784, 200, 80, 10])?;

    let model_dir = "demos/trained_models";
    std::fs::create_dir_all(model_dir)?;
    let config = TrainConfig::new(10, 0.01)
        .early_stop(true)
        .checkpoint(format!("{model_dir}/mnist_200_80_10_{{epoch}}.json"));

    let eval: EvalSet = (&test.inputs, &test.targets);
    let history = train_loop(&mut network, &train.inputs, &train.targets, Some(eval), &config)?;

    println!("\n{:>6}  {:>10}  {:>10}  {:>6}", "Epoch", "MSE Loss", "Test Acc", "Saved");
    println!("{}", "─".repeat(40));
    for s in &history {
        println!(
            "{:>6}  {:>10.6}  {:>9.2}%  {:>6}",
            s.epoch,
            s.train_loss,
            s.eval_accuracy.unwrap_or(0.0) * 100.0,
            s.saved
        );
    }

    // --- Sample predictions ---
    println!("\nSample predictions (first 10 test images):");
    println!("{:>12}  {:>12}", "True Label", "Predicted");
    println!("{}", "-".repeat(27));
    for (input, class) in test.inputs.iter().zip(test.classes.iter()).take(10) {
        let predicted = argmax(&network.predict(input)?);
        println!("{:>12}  {:>12}", class, predicted);
    }
    Ok(())
}
