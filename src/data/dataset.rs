use anyhow::{bail, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One encoded training example: a padded password and its padded label row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePair {
    pub source: Vec<u32>,
    pub target: Vec<u32>,
}

/// Paired source/target id rows, right-padded to corpus-wide widths.
///
/// Row `i` of `source` and row `i` of `target` always belong together;
/// every operation that reorders rows applies to both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelCorpus {
    source: Vec<Vec<u32>>,
    target: Vec<Vec<u32>>,
}

impl ParallelCorpus {
    pub fn new(source: Vec<Vec<u32>>, target: Vec<Vec<u32>>) -> Result<Self> {
        if source.len() != target.len() {
            bail!(
                "source has {} rows but target has {}",
                source.len(),
                target.len()
            );
        }
        if let Some(width) = source.first().map(Vec::len) {
            if let Some(i) = source.iter().position(|r| r.len() != width) {
                bail!("source row {i} has width {} (expected {width})", source[i].len());
            }
        }
        if let Some(width) = target.first().map(Vec::len) {
            if width < 2 {
                bail!("target rows need at least 2 positions, got {width}");
            }
            if let Some(i) = target.iter().position(|r| r.len() != width) {
                bail!("target row {i} has width {} (expected {width})", target[i].len());
            }
        }
        Ok(Self { source, target })
    }

    pub fn len(&self) -> usize { self.source.len() }

    pub fn is_empty(&self) -> bool { self.source.is_empty() }

    /// The examples in rows `range`, in order, ready for the batcher.
    pub fn items(&self, range: Range<usize>) -> Vec<SequencePair> {
        range.filter_map(|i| self.get(i)).collect()
    }

    /// New corpus whose row `k` is row `indices[k]` of this one.
    ///
    /// Panics if an index is out of bounds.
    pub fn gather(&self, indices: &[usize]) -> Self {
        Self {
            source: indices.iter().map(|&i| self.source[i].clone()).collect(),
            target: indices.iter().map(|&i| self.target[i].clone()).collect(),
        }
    }
}

impl Dataset<SequencePair> for ParallelCorpus {
    fn get(&self, index: usize) -> Option<SequencePair> {
        Some(SequencePair {
            source: self.source.get(index)?.clone(),
            target: self.target.get(index)?.clone(),
        })
    }

    fn len(&self) -> usize {
        self.source.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(source: &[u32], target: &[u32]) -> SequencePair {
        SequencePair { source: source.to_vec(), target: target.to_vec() }
    }

    #[test]
    fn test_rejects_row_count_mismatch() {
        assert!(ParallelCorpus::new(vec![vec![1]], vec![]).is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let src = vec![vec![1, 2], vec![1]];
        let tgt = vec![vec![1, 2], vec![1, 2]];
        assert!(ParallelCorpus::new(src, tgt).is_err());

        let src = vec![vec![1, 2], vec![1, 2]];
        let tgt = vec![vec![1, 2, 3], vec![1, 2]];
        assert!(ParallelCorpus::new(src, tgt).is_err());
    }

    #[test]
    fn test_rejects_too_short_targets() {
        assert!(ParallelCorpus::new(vec![vec![1]], vec![vec![1]]).is_err());
    }

    #[test]
    fn test_dataset_get_and_gather() {
        let c = ParallelCorpus::new(
            vec![vec![10, 11], vec![20, 21], vec![30, 31]],
            vec![vec![1, 10, 0], vec![1, 20, 0], vec![1, 30, 0]],
        )
        .unwrap();
        assert_eq!(Dataset::len(&c), 3);
        assert_eq!(c.get(1), Some(pair(&[20, 21], &[1, 20, 0])));
        assert_eq!(c.get(3), None);

        let g = c.gather(&[2, 0]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.get(0), Some(pair(&[30, 31], &[1, 30, 0])));
        assert_eq!(g.get(1), Some(pair(&[10, 11], &[1, 10, 0])));
    }

    #[test]
    fn test_items_follow_row_order() {
        let c = ParallelCorpus::new(
            vec![vec![10], vec![20], vec![30], vec![40]],
            vec![vec![1, 10], vec![1, 20], vec![1, 30], vec![1, 40]],
        )
        .unwrap();
        let items = c.items(1..3);
        assert_eq!(items, vec![pair(&[20], &[1, 20]), pair(&[30], &[1, 30])]);
        assert!(c.items(4..4).is_empty());
    }

    #[test]
    fn test_empty_corpus_is_valid() {
        let c = ParallelCorpus::new(Vec::new(), Vec::new()).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.get(0), None);
    }
}
