//! Output labels for internal vertex indices.
//!
//! The sampler's acyclic guarantee depends on internal index order, which
//! would leak a topological order into the output. A [`LabelMapping`] hides it
//! by renaming vertices at serialization time only.

use rand::{Rng, seq::SliceRandom};

/// A bijection from internal vertex indices to printed labels.
///
/// # Examples
/// ```
/// use digraphgen_core::LabelMapping;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let identity = LabelMapping::identity(3);
/// assert_eq!(identity.label(2), Some(2));
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let shuffled = LabelMapping::shuffled(4, &mut rng);
/// let mut labels: Vec<u32> = (0..4).filter_map(|index| shuffled.label(index)).collect();
/// labels.sort_unstable();
/// assert_eq!(labels, vec![0, 1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMapping {
    labels: Vec<u32>,
}

impl LabelMapping {
    /// Labels every vertex with its own index.
    #[must_use]
    pub fn identity(vertex_count: u32) -> Self {
        Self {
            labels: (0..vertex_count).collect(),
        }
    }

    /// Labels vertices with a uniformly random permutation of `0..vertex_count`.
    #[must_use]
    pub fn shuffled<R>(vertex_count: u32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut mapping = Self::identity(vertex_count);
        mapping.labels.shuffle(rng);
        mapping
    }

    /// Returns the printed label of internal vertex `index`.
    #[must_use]
    pub fn label(&self, index: u32) -> Option<u32> {
        self.labels.get(index as usize).copied()
    }

    /// Number of vertices covered by the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` when the mapping covers no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns `true` when every vertex keeps its own index as label.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.labels
            .iter()
            .zip(0_u32..)
            .all(|(&label, index)| label == index)
    }
}
