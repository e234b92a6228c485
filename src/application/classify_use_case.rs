// ============================================================
// Layer 2: ClassifyUseCase
// ============================================================
// Loads everything a trained run left in the checkpoint
// directory and rates passwords with it:
//
//   Step 1: Load source + target vocabularies   (Layer 6 - infra)
//   Step 2: Rebuild the model, load weights     (Layer 6 + 5)
//   Step 3: classify(password)                  (Layer 5 - ml)
//
// A missing or inconsistent checkpoint is a configuration error
// and fails construction; classification itself never fails on
// an unexpected model output (it falls back to WEAK).

use anyhow::Result;
use burn::prelude::*;

use crate::domain::{strength::Prediction, traits::PasswordClassifier};
use crate::infra::{checkpoint::CheckpointManager, vocab_store::VocabStore};
use crate::ml::{inferencer::Inferencer, InferBackend};

pub struct ClassifyUseCase<B: Backend = InferBackend> {
    inferencer: Inferencer<B>,
}

impl<B: Backend> ClassifyUseCase<B> {
    pub fn new(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        let (source_vocab, target_vocab) = VocabStore::new(checkpoint_dir).load()?;
        let ckpt       = CheckpointManager::new(checkpoint_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt, source_vocab, target_vocab, device)?;
        Ok(Self { inferencer })
    }
}

impl<B: Backend> PasswordClassifier for ClassifyUseCase<B> {
    fn classify(&self, password: &str) -> Result<Prediction> {
        self.inferencer.predict(password)
    }
}
