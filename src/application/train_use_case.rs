// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the password CSV           (Layer 4 - data)
//   Step 2: Split characters, label tokens  (Layer 4 - data)
//   Step 3: Pad both sides                  (Layer 4 - data)
//   Step 4: Build vocabularies, map to ids  (Layer 4 - data)
//   Step 5: Train / test split              (Layer 4 - data)
//   Step 6: Save vocabularies + config      (Layer 6 - infra)
//   Step 7: Epoch loop                      (Layer 5 - ml)
//             train_epoch → evaluate → log metrics → checkpoint
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use burn::{module::AutodiffModule, optim::AdamConfig, tensor::backend::AutodiffBackend};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::ParallelCorpus,
    loader::CsvCorpusLoader,
    preprocessor::{convert_to_id, pad_corpus, split_chars, TARGET_WINDOW},
    shuffler::split_train_test,
    vocab::Vocabulary,
};
use crate::domain::traits::CorpusSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
    vocab_store::{check_label_ids, VocabStore},
};
use crate::ml::{
    evaluator::{evaluate, EvalMetrics},
    model::{Seq2SeqConfig, TransformerSeq2Seq},
    trainer::Seq2SeqTrainer,
};

/// Position table size: the padded target row is the longest sequence.
pub const MAX_SEQ_LEN: usize = TARGET_WINDOW + 1;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved next to the checkpoints so inference can rebuild the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:      String,
    pub checkpoint_dir: String,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub d_model:        usize,
    pub num_heads:      usize,
    pub num_layers:     usize,
    pub d_ff:           usize,
    pub dropout:        f64,
    /// Share of rows used for training; the rest is the test split
    pub train_fraction: f64,
    /// Fixes the split and the per-epoch shuffles when set
    pub seed:           Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:      "data/passwords.csv".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            batch_size:     100,
            epochs:         1,
            lr:             1e-3,
            d_model:        64,
            num_heads:      4,
            num_layers:     1,
            d_ff:           256,
            dropout:        0.1,
            train_fraction: 0.9,
            seed:           None,
        }
    }
}

impl TrainConfig {
    /// Model architecture for the given vocabulary sizes.
    pub fn model_config(&self, source_vocab_size: usize, target_vocab_size: usize) -> Seq2SeqConfig {
        Seq2SeqConfig::new(
            source_vocab_size,
            target_vocab_size,
            MAX_SEQ_LEN,
            self.d_model,
            self.num_heads,
            self.num_layers,
            self.d_ff,
            self.dropout,
            self.batch_size,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if self.num_heads == 0 || self.d_model % self.num_heads != 0 {
            bail!(
                "d_model ({}) must be a positive multiple of num_heads ({})",
                self.d_model,
                self.num_heads
            );
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            bail!("train_fraction must lie strictly between 0 and 1, got {}", self.train_fraction);
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline on backend `B` and return the metrics of
    /// the final epoch on the test split.
    pub fn execute<B: AutodiffBackend>(&self, device: B::Device) -> Result<EvalMetrics> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load the corpus ───────────────────────────────────────────
        tracing::info!("Loading corpus from '{}'", cfg.data_path);
        let rows = CsvCorpusLoader::new(&cfg.data_path).load_all()?;
        if rows.is_empty() {
            bail!("corpus '{}' has no usable rows", cfg.data_path);
        }

        // ── Step 2: Characters in, label token out ────────────────────────────
        let sources: Vec<Vec<String>> = rows.iter().map(|r| split_chars(&r.password)).collect();
        let targets: Vec<Vec<String>> = rows
            .iter()
            .map(|r| vec![r.strength.token().to_string()])
            .collect();

        // ── Steps 3-4: Pad, build vocabularies, convert ───────────────────────
        let (sources, targets) = pad_corpus(&sources, &targets);
        let source_vocab = Vocabulary::build(&sources);
        let target_vocab = Vocabulary::build(&targets);
        check_label_ids(&target_vocab)?;
        tracing::info!(
            "Vocabularies: {} source tokens, {} target tokens",
            source_vocab.len(),
            target_vocab.len()
        );

        let corpus = ParallelCorpus::new(
            convert_to_id(&source_vocab, &sources),
            convert_to_id(&target_vocab, &targets),
        )?;

        // ── Step 5: Train / test split ────────────────────────────────────────
        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let (train, test) = split_train_test(&corpus, cfg.train_fraction, &mut rng);
        if train.is_empty() || test.is_empty() {
            bail!(
                "corpus of {} rows is too small for a {:.2} train fraction",
                corpus.len(),
                cfg.train_fraction
            );
        }
        tracing::info!("Split: {} train, {} test", train.len(), test.len());

        // ── Step 6: Persist what inference needs ──────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        VocabStore::new(&cfg.checkpoint_dir).save(&source_vocab, &target_vocab)?;
        ckpt_manager.save_config(cfg)?;
        let metrics_logger = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 7: Model, Adam, epoch loop ───────────────────────────────────
        let model_cfg = cfg.model_config(source_vocab.len(), target_vocab.len());
        let mut model: TransformerSeq2Seq<B> = model_cfg.init(&device);
        tracing::info!("Model ready: {} layers, d_model={}", cfg.num_layers, cfg.d_model);

        let optim = AdamConfig::new()
            .with_epsilon(1e-8)
            .init::<B, TransformerSeq2Seq<B>>();
        let mut trainer = Seq2SeqTrainer::<B, _, _>::new(optim, cfg.lr, device.clone(), rng);

        let pad_id = target_vocab.pad_id();
        let mut best_perplexity = f64::INFINITY;
        let mut last = None;

        for epoch in 1..=cfg.epochs {
            model = trainer.train_epoch(model, &train, pad_id)?;

            // model.valid() → inner backend, dropout disabled
            let metrics = evaluate::<B::InnerBackend, _>(&model.valid(), &test, pad_id, &device)?;

            let row = EpochMetrics {
                epoch,
                perplexity: metrics.perplexity,
                accuracy:   metrics.accuracy,
                train_rows: train.len(),
                test_rows:  test.len(),
            };
            if row.is_improvement(best_perplexity) {
                best_perplexity = row.perplexity;
            }
            metrics_logger.log(&row)?;

            tracing::info!(
                "Epoch {:>3}/{} | perplexity={:.4} | accuracy={:.1}% | best={:.4}",
                epoch,
                cfg.epochs,
                metrics.perplexity,
                metrics.accuracy * 100.0,
                best_perplexity,
            );

            ckpt_manager.save_model(&model, epoch)?;
            last = Some(metrics);
        }

        // epochs >= 1 was validated above
        let Some(final_metrics) = last else {
            bail!("no epoch was run");
        };
        tracing::info!(
            "Training complete: perplexity={:.4}, accuracy={:.4}",
            final_metrics.perplexity,
            final_metrics.accuracy
        );
        Ok(final_metrics)
    }
}
