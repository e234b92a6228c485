// ============================================================
// Layer 4: Batch Shuffler
// ============================================================
// Produces a random reordering of a ParallelCorpus for one
// training epoch, and the one-off train/test split used by the
// training driver.
//
// The permutation is drawn once (Fisher-Yates via
// rand::seq::SliceRandom) and then applied to BOTH the source
// and target rows, so a password can never be separated from
// its label:
//
//   indices:  [2, 0, 1]
//   source:   [s0, s1, s2] → [s2, s0, s1]
//   target:   [t0, t1, t2] → [t2, t0, t1]
//
// Only the training loop shuffles. Evaluation and inference
// read rows in their original order so metrics are reproducible.

use rand::{seq::SliceRandom, Rng};

use crate::data::dataset::ParallelCorpus;

/// A uniformly random permutation of `0..n`.
pub fn permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Reorder both sides of the corpus with one shared permutation.
pub fn shuffle_pairs<R: Rng + ?Sized>(corpus: &ParallelCorpus, rng: &mut R) -> ParallelCorpus {
    let indices = permutation(corpus.len(), rng);
    corpus.gather(&indices)
}

/// Shuffle once, then split into (train, test).
///
/// `train_fraction` is clamped to `[0, 1]`; e.g. 0.9 puts 90% of the
/// rows in the training split.
pub fn split_train_test<R: Rng + ?Sized>(
    corpus:         &ParallelCorpus,
    train_fraction: f64,
    rng:            &mut R,
) -> (ParallelCorpus, ParallelCorpus) {
    let indices  = permutation(corpus.len(), rng);
    let total    = indices.len();
    let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = split_at.min(total);

    let train = corpus.gather(&indices[..split_at]);
    let test  = corpus.gather(&indices[split_at..]);

    tracing::debug!(
        "Dataset split: {} training, {} test",
        train.len(),
        test.len(),
    );

    (train, test)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::dataset::Dataset;
    use rand::{rngs::StdRng, SeedableRng};

    /// Row `i` carries the marker `1000 + i` on both sides.
    fn tagged_corpus(n: usize) -> ParallelCorpus {
        let source = (0..n).map(|i| vec![1000 + i as u32, 7]).collect();
        let target = (0..n).map(|i| vec![1, 1000 + i as u32, 0]).collect();
        ParallelCorpus::new(source, target).unwrap()
    }

    #[test]
    fn test_permutation_covers_every_index_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut p   = permutation(50, &mut rng);
        p.sort_unstable();
        assert_eq!(p, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_preserves_pairing() {
        let mut rng  = StdRng::seed_from_u64(42);
        let corpus   = tagged_corpus(100);
        let shuffled = shuffle_pairs(&corpus, &mut rng);

        assert_eq!(shuffled.len(), corpus.len());
        for i in 0..shuffled.len() {
            let pair = shuffled.get(i).unwrap();
            assert_eq!(pair.source[0], pair.target[1], "row {i} lost its pairing");
        }
        // With 100 rows the identity permutation is vanishingly unlikely.
        assert_ne!(shuffled, corpus);
    }

    #[test]
    fn test_shuffle_keeps_every_row() {
        let mut rng  = StdRng::seed_from_u64(3);
        let shuffled = shuffle_pairs(&tagged_corpus(20), &mut rng);
        let mut markers: Vec<u32> = shuffled.items(0..20).iter().map(|p| p.source[0]).collect();
        markers.sort_unstable();
        assert_eq!(markers, (1000..1020).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_sizes_and_pairing() {
        let mut rng       = StdRng::seed_from_u64(1);
        let (train, test) = split_train_test(&tagged_corpus(100), 0.8, &mut rng);
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);
        for part in [&train, &test] {
            for pair in part.items(0..part.len()) {
                assert_eq!(pair.source[0], pair.target[1]);
            }
        }
    }

    #[test]
    fn test_split_empty_corpus() {
        let mut rng       = StdRng::seed_from_u64(1);
        let empty         = ParallelCorpus::new(Vec::new(), Vec::new()).unwrap();
        let (train, test) = split_train_test(&empty, 0.8, &mut rng);
        assert!(train.is_empty());
        assert!(test.is_empty());
    }
}
