// ============================================================
// Layer 5: Training Loop
// ============================================================
// One epoch of teacher-forced training over a ParallelCorpus.
//
//   shuffle pairs once
//   for each batch (stepping by model.batch_size(), short tail kept):
//       batch    = batcher.batch(items, device)   ← Burn Batcher
//       logits   = model.forward(source, decoder_input)   ← autodiff
//       loss     = model.loss(logits, loss_target, mask)
//       grads    = loss.backward()
//       model    = optim.step(lr, model, grads)
//
// Every 10th batch (configurable, 0 turns it off) the masked loss
// and accuracy are logged. The report only reads tensor values; it
// never feeds back into the update.
//
// Key Burn 0.20 points:
//   - B must be an AutodiffBackend so loss.backward() exists
//   - optim.step() consumes the model and hands back the updated
//     one, so train_epoch takes the model by value and returns it
//   - evaluation happens on model.valid() (see evaluator.rs)
//
// Epoch iteration, checkpointing and metrics logging belong to the
// training driver (application::train_use_case), not to this loop.

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use rand::Rng;

use crate::data::{
    batcher::{batch_ranges, Seq2SeqBatcher},
    dataset::ParallelCorpus,
    shuffler::shuffle_pairs,
};
use crate::ml::seq2seq::Seq2SeqModel;

/// Batches between two progress reports.
pub const REPORT_EVERY: usize = 10;

pub struct Seq2SeqTrainer<B: AutodiffBackend, O, R> {
    optim:        O,
    lr:           f64,
    device:       B::Device,
    rng:          R,
    report_every: usize,
}

impl<B: AutodiffBackend, O, R: Rng> Seq2SeqTrainer<B, O, R> {
    pub fn new(optim: O, lr: f64, device: B::Device, rng: R) -> Self {
        Self { optim, lr, device, rng, report_every: REPORT_EVERY }
    }

    /// Batches between progress reports; 0 disables them.
    pub fn with_report_every(mut self, report_every: usize) -> Self {
        self.report_every = report_every;
        self
    }

    /// Run one full pass over `corpus` and return the updated model.
    pub fn train_epoch<M>(&mut self, model: M, corpus: &ParallelCorpus, pad_id: u32) -> Result<M>
    where
        M: Seq2SeqModel<B> + AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        let mut model   = model;
        let batcher     = Seq2SeqBatcher::<B>::new(pad_id);
        let shuffled    = shuffle_pairs(corpus, &mut self.rng);
        let ranges      = batch_ranges(shuffled.len(), model.batch_size())?;
        let num_batches = ranges.len();

        tracing::debug!("Training epoch: {} rows in {} batches", shuffled.len(), num_batches);

        for (index, range) in ranges.into_iter().enumerate() {
            let batch = batcher.batch(shuffled.items(range), &self.device)?;

            let logits = model.forward(batch.input);
            let loss   = model.loss(logits.clone(), batch.loss_target.clone(), batch.mask.clone());

            let batch_number = index + 1;
            if self.report_every > 0 && batch_number % self.report_every == 0 {
                let accuracy = model.accuracy(logits, batch.loss_target, batch.mask);
                let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
                tracing::info!(
                    "batch {:>5}/{} | loss={:.4} | loss/token={:.4} | accuracy={:.1}%",
                    batch_number,
                    num_batches,
                    loss_val,
                    loss_val / batch.word_count.max(1) as f64,
                    accuracy * 100.0,
                );
            }

            // Backward pass + optimiser update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = self.optim.step(self.lr, model, grads);
        }

        Ok(model)
    }
}
