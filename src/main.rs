use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ferrite_fc::data::load_idx_pair;
use ferrite_fc::train::{count_correct, EvalSet};
use ferrite_fc::{train_loop, LossType, Network, NetworkSpec, TrainConfig};

#[derive(Parser)]
#[command(name = "ferrite-fc")]
#[command(about = "Train and test a fully-connected network on IDX (MNIST-format) data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: Level,
}

#[derive(Clone, Copy, ValueEnum)]
enum LossArg {
    Mse,
    CrossEntropy,
}

impl From<LossArg> for LossType {
    fn from(l: LossArg) -> Self {
        match l {
            LossArg::Mse => LossType::Mse,
            LossArg::CrossEntropy => LossType::CrossEntropy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write an architecture spec to JSON
    Init {
        /// Model name
        #[arg(short, long, default_value = "mnist")]
        name: String,

        /// Layer widths, input first
        #[arg(short, long, value_delimiter = ',', default_value = "784,200,80,10")]
        sizes: Vec<usize>,

        #[arg(long, value_enum, default_value = "mse")]
        loss: LossArg,

        /// Output spec path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Train a network
    Train {
        /// Training images (IDX3)
        #[arg(long)]
        images: PathBuf,

        /// Training labels (IDX1)
        #[arg(long)]
        labels: PathBuf,

        /// Test images scored after every epoch
        #[arg(long, requires = "test_labels")]
        test_images: Option<PathBuf>,

        #[arg(long, requires = "test_images")]
        test_labels: Option<PathBuf>,

        /// Architecture spec written by `init`
        #[arg(long, conflicts_with = "model")]
        spec: Option<PathBuf>,

        /// Resume from a saved model instead of a fresh network
        #[arg(long)]
        model: Option<PathBuf>,

        /// Layer widths when neither --spec nor --model is given
        #[arg(long, value_delimiter = ',', default_value = "784,200,80,10")]
        sizes: Vec<usize>,

        #[arg(short = 'r', long, default_value = "0.01")]
        learning_rate: f64,

        #[arg(short, long, default_value = "10")]
        epochs: usize,

        /// Shuffle sample order every epoch
        #[arg(long)]
        shuffle: bool,

        /// Seed for the shuffle
        #[arg(long, requires = "shuffle")]
        seed: Option<u64>,

        /// Keep going when an epoch does not improve
        #[arg(long)]
        no_early_stop: bool,

        /// Checkpoint path; `{epoch}` is replaced by the epoch number
        #[arg(short, long, default_value = "model_{epoch}.json")]
        out: PathBuf,
    },

    /// Score a saved model against a labelled set
    Test {
        #[arg(short, long)]
        model: PathBuf,

        #[arg(long)]
        images: PathBuf,

        #[arg(long)]
        labels: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { name, sizes, loss, out } => {
            let spec = NetworkSpec::new(name, sizes, loss.into());
            // Fail on a bad architecture now rather than at train time.
            spec.build().context("invalid architecture")?;
            spec.save_json(&out)
                .with_context(|| format!("writing spec to {}", out.display()))?;
            info!(path = %out.display(), sizes = ?spec.sizes, "wrote spec");
        }

        Commands::Train {
            images,
            labels,
            test_images,
            test_labels,
            spec,
            model,
            sizes,
            learning_rate,
            epochs,
            shuffle,
            seed,
            no_early_stop,
            out,
        } => {
            let mut network = match (model, spec) {
                (Some(path), _) => Network::load_json(&path)
                    .with_context(|| format!("loading model {}", path.display()))?,
                (None, Some(path)) => NetworkSpec::load_json(&path)
                    .with_context(|| format!("loading spec {}", path.display()))?
                    .build()?,
                (None, None) => Network::new(&sizes)?,
            };
            let n_classes = network.output_size();

            let train = load_idx_pair(&images, &labels, n_classes)
                .context("loading training set")?;
            let test = match (test_images, test_labels) {
                (Some(i), Some(l)) => Some(load_idx_pair(&i, &l, n_classes).context("loading test set")?),
                _ => None,
            };

            let mut config = TrainConfig::new(epochs, learning_rate)
                .early_stop(!no_early_stop)
                .checkpoint(out);
            if shuffle {
                config = config.shuffle(seed);
            }

            let eval: Option<EvalSet> = test.as_ref().map(|t| (t.inputs.as_slice(), t.targets.as_slice()));
            let history = train_loop(&mut network, &train.inputs, &train.targets, eval, &config)?;

            match history.iter().filter(|s| s.saved).last() {
                Some(best) => info!(epoch = best.epoch, loss = best.train_loss, "best model saved"),
                None => bail!("no epoch was saved"),
            }
        }

        Commands::Test { model, images, labels } => {
            let mut network = Network::load_json(&model)
                .with_context(|| format!("loading model {}", model.display()))?;
            let test = load_idx_pair(&images, &labels, network.output_size())
                .context("loading test set")?;

            let correct = count_correct(&mut network, &test.inputs, &test.targets)?;
            let pct = correct as f64 / test.len().max(1) as f64 * 100.0;
            println!("Num Correct: {correct}");
            println!("Percentage Correct: {pct:.2}%");
        }
    }

    Ok(())
}
