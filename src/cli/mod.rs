// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Argument parsing for the two binaries. All real work is
// delegated to Layer 2 (application).
//
//   pwstrength <PASSWORD>      → prints WEAK, MEDIUM or STRONG
//   pwstrength-train [FLAGS]   → trains and checkpoints a model
//
// A wrong number of positional arguments is a usage error: clap
// prints the usage line and exits with status 2.

pub mod commands;

use anyhow::Result;
use clap::Parser;

use commands::{ClassifyArgs, TrainArgs};

/// Rate a password with the trained model.
#[derive(Parser, Debug)]
#[command(
    name = "pwstrength",
    version,
    about = "Classify a password as WEAK, MEDIUM or STRONG."
)]
pub struct ClassifyCli {
    #[command(flatten)]
    pub args: ClassifyArgs,
}

impl ClassifyCli {
    pub fn run(self) -> Result<()> {
        use crate::application::classify_use_case::ClassifyUseCase;
        use crate::domain::traits::PasswordClassifier;

        let device = Default::default();
        let use_case: ClassifyUseCase =
            ClassifyUseCase::new(&self.args.checkpoint_dir, device)?;

        let prediction = use_case.classify(&self.args.password)?;
        println!("{}", prediction.label);
        Ok(())
    }
}

/// Train the password strength model on a labelled CSV corpus.
#[derive(Parser, Debug)]
#[command(
    name = "pwstrength-train",
    version,
    about = "Train the character-level password strength model."
)]
pub struct TrainCli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl TrainCli {
    pub fn run(self) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;
        use crate::ml::TrainBackend;

        tracing::info!("Starting training on '{}'", self.args.data);

        let device   = Default::default();
        let use_case = TrainUseCase::new(self.args.into());
        let metrics  = use_case.execute::<TrainBackend>(device)?;

        println!(
            "Training complete. perplexity={:.4} accuracy={:.4}",
            metrics.perplexity, metrics.accuracy
        );
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;

    #[test]
    fn test_classify_takes_exactly_one_password() {
        let cli = ClassifyCli::try_parse_from(["pwstrength", "hunter2"]).unwrap();
        assert_eq!(cli.args.password, "hunter2");
        assert_eq!(cli.args.checkpoint_dir, "checkpoints");

        assert!(ClassifyCli::try_parse_from(["pwstrength"]).is_err());
        assert!(ClassifyCli::try_parse_from(["pwstrength", "a", "b"]).is_err());
    }

    #[test]
    fn test_password_may_start_with_a_hyphen() {
        let cli = ClassifyCli::try_parse_from(["pwstrength", "-Zx9!qT7"]).unwrap();
        assert_eq!(cli.args.password, "-Zx9!qT7");

        let cli = ClassifyCli::try_parse_from(["pwstrength", "--checkpoint-dir", "ckpt", "-Zx9!qT7"]).unwrap();
        assert_eq!(cli.args.password, "-Zx9!qT7");
        assert_eq!(cli.args.checkpoint_dir, "ckpt");

        let cli = ClassifyCli::try_parse_from(["pwstrength", "--", "-h"]).unwrap();
        assert_eq!(cli.args.password, "-h");
    }

    #[test]
    fn test_usage_error_exit_code_is_nonzero() {
        let err = ClassifyCli::try_parse_from(["pwstrength"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_train_flags_map_to_config() {
        let cli = TrainCli::try_parse_from([
            "pwstrength-train", "--data", "rows.csv", "--epochs", "3", "--seed", "9",
        ])
        .unwrap();
        let cfg: TrainConfig = cli.args.into();
        assert_eq!(cfg.data_path, "rows.csv");
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.batch_size, TrainConfig::default().batch_size);
    }
}
