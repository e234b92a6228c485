// ============================================================
// Layer 5: Sequence Model Contract
// ============================================================
// The training, evaluation and inference loops never look inside
// the model. They only rely on this contract:
//
//   forward(ModelInput { source, decoder_input }) → logits
//       logits: [batch, positions, target_vocab]
//
//   loss(logits, loss_target, mask)     → scalar tensor (differentiable)
//   accuracy(logits, loss_target, mask) → f64
//
// Default loss is the masked SUM of per-token cross-entropy, so
// dividing an accumulated loss by the number of non-padding
// tokens gives the mean per-token loss (and exp of that is the
// perplexity). Default accuracy is the fraction of non-padding
// positions whose arg-max matches the target.

use burn::prelude::*;
use burn::tensor::{activation::log_softmax, ElementConversion};

use crate::data::batcher::ModelInput;

pub trait Seq2SeqModel<B: Backend> {
    /// Rows per training/evaluation batch.
    fn batch_size(&self) -> usize;

    fn forward(&self, input: ModelInput<B>) -> Tensor<B, 3>;

    fn loss(
        &self,
        logits:      Tensor<B, 3>,
        loss_target: Tensor<B, 2, Int>,
        mask:        Tensor<B, 2, Bool>,
    ) -> Tensor<B, 1> {
        masked_cross_entropy(logits, loss_target, mask)
    }

    fn accuracy(
        &self,
        logits:      Tensor<B, 3>,
        loss_target: Tensor<B, 2, Int>,
        mask:        Tensor<B, 2, Bool>,
    ) -> f64 {
        masked_accuracy(logits, loss_target, mask)
    }
}

/// Sum of `-log softmax(logits)[target]` over positions where `mask` is true.
pub fn masked_cross_entropy<B: Backend>(
    logits: Tensor<B, 3>,
    target: Tensor<B, 2, Int>,
    mask:   Tensor<B, 2, Bool>,
) -> Tensor<B, 1> {
    let [batch, positions, _] = logits.dims();

    let log_probs = log_softmax(logits, 2);
    let picked = log_probs
        .gather(2, target.reshape([batch, positions, 1]))
        .reshape([batch, positions]);

    picked.mask_fill(mask.bool_not(), 0.0).sum().neg()
}

/// Correct arg-max predictions over masked positions, divided by the
/// masked position count. 0.0 when nothing is masked in.
pub fn masked_accuracy<B: Backend>(
    logits: Tensor<B, 3>,
    target: Tensor<B, 2, Int>,
    mask:   Tensor<B, 2, Bool>,
) -> f64 {
    let [batch, positions, _] = logits.dims();
    let mask = mask.int();

    let predicted = logits.argmax(2).reshape([batch, positions]);
    let correct: f64 = predicted
        .equal(target)
        .int()
        .mul(mask.clone())
        .sum()
        .into_scalar()
        .elem::<f64>();
    let total: f64 = mask.sum().into_scalar().elem::<f64>();

    if total == 0.0 { 0.0 } else { correct / total }
}

/// Arg-max id per position, copied to the host: `[batch][position]`.
pub fn argmax_ids<B: Backend>(logits: Tensor<B, 3>) -> Vec<Vec<i64>> {
    let [batch, positions, _] = logits.dims();
    let flat: Vec<i64> = logits
        .argmax(2)
        .reshape([batch, positions])
        .into_data()
        .iter::<i64>()
        .collect();

    flat.chunks(positions.max(1)).map(<[i64]>::to_vec).collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn logits(values: &[f32], shape: [usize; 3]) -> Tensor<TestBackend, 3> {
        Tensor::<TestBackend, 1>::from_floats(values, &Default::default()).reshape(shape)
    }

    fn ids(values: &[i32], shape: [usize; 2]) -> Tensor<TestBackend, 2, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints(values, &Default::default()).reshape(shape)
    }

    fn mask(values: &[i32], shape: [usize; 2]) -> Tensor<TestBackend, 2, Bool> {
        ids(values, shape).equal_elem(1)
    }

    fn scalar(t: Tensor<TestBackend, 1>) -> f64 {
        t.into_scalar().elem::<f64>()
    }

    #[test]
    fn test_uniform_logits_cost_ln_vocab_per_token() {
        // 1 row, 3 positions, vocab 4; only 2 positions count.
        let loss = masked_cross_entropy(
            logits(&[0.0; 12], [1, 3, 4]),
            ids(&[1, 2, 0], [1, 3]),
            mask(&[1, 1, 0], [1, 3]),
        );
        let expected = 2.0 * (4.0f64).ln();
        assert!((scalar(loss) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_masked_positions_do_not_change_loss() {
        let confident_wrong = [0.0, 0.0, 0.0, 9.0]; // strongly predicts id 3
        let mut values = vec![0.0f32; 4];
        values.extend_from_slice(&confident_wrong);

        let target = ids(&[1, 1], [1, 2]);
        let masked_out = masked_cross_entropy(
            logits(&values, [1, 2, 4]),
            target.clone(),
            mask(&[1, 0], [1, 2]),
        );
        let only_first = masked_cross_entropy(
            logits(&[0.0; 4], [1, 1, 4]),
            ids(&[1], [1, 1]),
            mask(&[1], [1, 1]),
        );
        assert!((scalar(masked_out) - scalar(only_first)).abs() < 1e-5);
    }

    #[test]
    fn test_accuracy_counts_only_masked_positions() {
        // argmax per position: 2, 0, 3
        let values = [
            0.0, 0.0, 5.0, 0.0,
            5.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 5.0,
        ];
        let acc = masked_accuracy(
            logits(&values, [1, 3, 4]),
            ids(&[2, 1, 0], [1, 3]),
            mask(&[1, 1, 0], [1, 3]),
        );
        assert!((acc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_with_empty_mask_is_zero() {
        let acc = masked_accuracy(
            logits(&[0.0; 4], [1, 1, 4]),
            ids(&[0], [1, 1]),
            mask(&[0], [1, 1]),
        );
        assert_eq!(acc, 0.0);
    }

    #[test]
    fn test_argmax_ids_shape() {
        let values = [
            0.0, 9.0, 0.0,   0.0, 0.0, 9.0,
            9.0, 0.0, 0.0,   0.0, 9.0, 0.0,
        ];
        let out = argmax_ids(logits(&values, [2, 2, 3]));
        assert_eq!(out, vec![vec![1, 2], vec![0, 1]]);
    }
}
