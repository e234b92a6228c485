// ============================================================
// Layer 1: CLI Arguments
// ============================================================
// Flags for the two binaries. clap's derive macros generate the
// help text, usage errors and string → number conversion.

use clap::Args;

use crate::application::train_use_case::TrainConfig;

/// Arguments of `pwstrength`: exactly one password.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The password to rate; a leading '-' is part of the password
    #[arg(allow_hyphen_values = true)]
    pub password: String,

    /// Directory holding the weights and vocabularies from training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

/// Arguments of `pwstrength-train`.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file of `password,strength` rows (strength 0, 1 or 2)
    #[arg(long, default_value = "data/passwords.csv")]
    pub data: String,

    /// Directory to save weights, vocabularies, config and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Rows per batch
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Number of full passes through the training split
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Hidden dimension of the transformer
    #[arg(long, default_value_t = 64)]
    pub d_model: usize,

    /// Attention heads; d_model must be divisible by this
    #[arg(long, default_value_t = 4)]
    pub num_heads: usize,

    /// Encoder and decoder blocks (each)
    #[arg(long, default_value_t = 1)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 256)]
    pub d_ff: usize,

    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Share of rows used for training, the rest is held out
    #[arg(long, default_value_t = 0.9)]
    pub train_fraction: f64,

    /// Seed for the split and the per-epoch shuffles
    #[arg(long)]
    pub seed: Option<u64>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:      a.data,
            checkpoint_dir: a.checkpoint_dir,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            d_model:        a.d_model,
            num_heads:      a.num_heads,
            num_layers:     a.num_layers,
            d_ff:           a.d_ff,
            dropout:        a.dropout,
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}
