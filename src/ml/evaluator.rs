// ============================================================
// Layer 5: Evaluation Loop
// ============================================================
// Scores a frozen model on a ParallelCorpus in its original row
// order (no shuffling, so repeated runs agree exactly).
//
// Per batch:
//   total_words += non-padding loss positions in the batch
//   loss_sum    += masked summed loss
//   acc_sum     += masked accuracy × batch word count
//
// Final:
//   perplexity = exp(loss_sum / total_words)
//   accuracy   = acc_sum / total_words
//
// Because the loss is a sum over tokens, loss_sum / total_words
// is the mean per-token loss over the whole split. Averaging the
// per-batch perplexities instead would over-weight small batches.
//
// Call this on model.valid(): the inner backend has no autodiff
// graph, so no gradient can ever be applied from here.

use anyhow::{bail, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*, tensor::ElementConversion};

use crate::data::{
    batcher::{batch_ranges, Seq2SeqBatcher},
    dataset::ParallelCorpus,
};
use crate::ml::seq2seq::Seq2SeqModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalMetrics {
    pub perplexity: f64,
    pub accuracy:   f64,
    /// Non-padding target tokens the metrics were computed over
    pub words:      usize,
}

/// Running sums for one evaluation pass.
#[derive(Debug, Default, Clone)]
pub struct MetricsAccumulator {
    loss_sum:    f64,
    acc_sum:     f64,
    total_words: usize,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one batch: its summed loss, its accuracy and its word count.
    pub fn record(&mut self, loss: f64, accuracy: f64, words: usize) {
        self.loss_sum    += loss;
        self.acc_sum     += accuracy * words as f64;
        self.total_words += words;
    }

    pub fn finish(&self) -> Result<EvalMetrics> {
        if self.total_words == 0 {
            bail!("evaluation data has no non-padding target tokens; perplexity is undefined");
        }
        let words = self.total_words as f64;
        Ok(EvalMetrics {
            perplexity: (self.loss_sum / words).exp(),
            accuracy:   self.acc_sum / words,
            words:      self.total_words,
        })
    }
}

/// Perplexity and accuracy of `model` on `corpus`, batched like training.
pub fn evaluate<B: Backend, M: Seq2SeqModel<B>>(
    model:  &M,
    corpus: &ParallelCorpus,
    pad_id: u32,
    device: &B::Device,
) -> Result<EvalMetrics> {
    let batcher = Seq2SeqBatcher::<B>::new(pad_id);
    let mut acc = MetricsAccumulator::new();

    for range in batch_ranges(corpus.len(), model.batch_size())? {
        let batch = batcher.batch(corpus.items(range), device)?;

        let logits = model.forward(batch.input);
        let loss: f64 = model
            .loss(logits.clone(), batch.loss_target.clone(), batch.mask.clone())
            .into_scalar()
            .elem::<f64>();
        let accuracy = model.accuracy(logits, batch.loss_target, batch.mask);

        acc.record(loss, accuracy, batch.word_count);
    }

    let metrics = acc.finish()?;
    tracing::debug!(
        "Evaluated {} rows ({} words): perplexity={:.4}, accuracy={:.4}",
        corpus.len(),
        metrics.words,
        metrics.perplexity,
        metrics.accuracy,
    );
    Ok(metrics)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::data::batcher::ModelInput;
    use crate::ml::model::{Seq2SeqConfig, TransformerSeq2Seq};

    type TestBackend = NdArray;

    /// Assigns the same score to every id at every position.
    struct UniformModel {
        vocab:      usize,
        batch_size: usize,
    }

    impl Seq2SeqModel<TestBackend> for UniformModel {
        fn batch_size(&self) -> usize {
            self.batch_size
        }

        fn forward(&self, input: ModelInput<TestBackend>) -> Tensor<TestBackend, 3> {
            let [batch, positions] = input.decoder_input.dims();
            Tensor::zeros([batch, positions, self.vocab], &input.decoder_input.device())
        }
    }

    fn corpus() -> ParallelCorpus {
        // pad = 0; words per row: 2, 2, 3, 1, 2 → 10 in total
        let source = vec![vec![7, 3]; 5];
        let target = vec![
            vec![1, 4, 2, 0, 0],
            vec![1, 5, 2, 0, 0],
            vec![1, 6, 6, 2, 0],
            vec![1, 2, 0, 0, 0],
            vec![1, 4, 2, 0, 0],
        ];
        ParallelCorpus::new(source, target).unwrap()
    }

    #[test]
    fn test_perplexity_is_exp_of_mean_token_loss() {
        let mut acc = MetricsAccumulator::new();
        acc.record(2.0, 0.5, 2);
        acc.record(9.0, 1.0, 8);

        let m = acc.finish().unwrap();
        assert_eq!(m.words, 10);
        assert!((m.perplexity - (11.0f64 / 10.0).exp()).abs() < 1e-12);
        assert!((m.accuracy - 0.9).abs() < 1e-12);

        // Not the mean of per-batch perplexities.
        let naive = ((2.0f64 / 2.0).exp() + (9.0f64 / 8.0).exp()) / 2.0;
        assert!((m.perplexity - naive).abs() > 1e-3);
    }

    #[test]
    fn test_zero_words_is_an_error() {
        let mut acc = MetricsAccumulator::new();
        acc.record(0.0, 0.0, 0);
        assert!(acc.finish().is_err());
    }

    #[test]
    fn test_all_padding_targets_are_an_error() {
        let corpus = ParallelCorpus::new(vec![vec![7, 3]], vec![vec![1, 0, 0]]).unwrap();
        let model  = UniformModel { vocab: 7, batch_size: 4 };
        assert!(evaluate::<TestBackend, _>(&model, &corpus, 0, &Default::default()).is_err());
    }

    #[test]
    fn test_uniform_model_perplexity_equals_vocab_size() {
        let device = Default::default();
        for batch_size in [1, 2, 3, 100] {
            let model = UniformModel { vocab: 7, batch_size };
            let m = evaluate::<TestBackend, _>(&model, &corpus(), 0, &device).unwrap();
            assert_eq!(m.words, 10);
            assert!((m.perplexity - 7.0).abs() < 1e-3, "batch_size={batch_size}: {}", m.perplexity);
        }
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let device = Default::default();
        let model: TransformerSeq2Seq<TestBackend> =
            Seq2SeqConfig::new(8, 7, 5, 16, 2, 1, 32, 0.0, 2).init(&device);

        let a = evaluate::<TestBackend, _>(&model, &corpus(), 0, &device).unwrap();
        let b = evaluate::<TestBackend, _>(&model, &corpus(), 0, &device).unwrap();
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a.accuracy));
    }
}
