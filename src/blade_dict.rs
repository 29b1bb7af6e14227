// src/blade_dict.rs
//! Cache of single-blade sparse representations, keyed by canonical name.
//!
//! Below seven dimensions every blade is materialized at construction; above
//! that the `2^d` upfront cost is skipped and blades are built and memoized
//! on first access. Both policies return identical values.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::blades::BladeIndexer;
use crate::error::Result;

/// Dimension at and below which all blades are materialized eagerly.
const EAGER_DIM_LIMIT: usize = 6;

/// The minimal sparse representation of one basis blade: a single unit
/// coefficient at the blade's own index, or, in graded mode, the indicator
/// over the blade's grade slice.
#[derive(Debug, Clone, PartialEq)]
pub struct BladePayload {
    pub keys: Vec<usize>,
    pub values: Vec<f64>,
}

#[derive(Debug)]
pub struct BladeDict {
    graded: bool,
    lazy: bool,
    blades: Mutex<HashMap<usize, Arc<BladePayload>>>,
}

impl BladeDict {
    pub fn new(indexer: &BladeIndexer, graded: bool) -> Self {
        let lazy = indexer.dim() > EAGER_DIM_LIMIT;
        let dict = Self {
            graded,
            lazy,
            blades: Mutex::new(HashMap::new()),
        };
        if !dict.lazy {
            let mut blades = dict.blades.lock();
            for index in 0..indexer.len() {
                blades.insert(index, Arc::new(dict.materialize(indexer, index)));
            }
        }
        dict
    }

    /// Whether blades are built on demand rather than upfront.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Number of materialized blades so far.
    pub fn len(&self) -> usize {
        self.blades.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blades.lock().is_empty()
    }

    /// Representation of the blade with the given canonical name.
    pub fn get(&self, indexer: &BladeIndexer, name: &str) -> Result<Arc<BladePayload>> {
        let index = indexer.index(name)?;
        Ok(self.get_by_index(indexer, index))
    }

    pub fn get_by_index(&self, indexer: &BladeIndexer, index: usize) -> Arc<BladePayload> {
        debug_assert!(index < indexer.len());
        if let Some(hit) = self.blades.lock().get(&index) {
            return Arc::clone(hit);
        }
        let payload = Arc::new(self.materialize(indexer, index));
        Arc::clone(self.blades.lock().entry(index).or_insert(payload))
    }

    fn materialize(&self, indexer: &BladeIndexer, index: usize) -> BladePayload {
        if self.graded {
            let grade = index.count_ones() as usize;
            let keys = indexer.indices_for_grade(grade).to_vec();
            let values = keys
                .iter()
                .map(|&k| if k == index { 1.0 } else { 0.0 })
                .collect();
            BladePayload { keys, values }
        } else {
            BladePayload { keys: vec![index], values: vec![1.0] }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    fn indexer(p: usize, q: usize, r: usize) -> BladeIndexer {
        BladeIndexer::new(&Signature::resolve(p, q, r, None, None).unwrap())
    }

    #[test]
    fn small_algebras_are_eager() {
        let ix = indexer(3, 0, 0);
        let dict = BladeDict::new(&ix, false);
        assert!(!dict.is_lazy());
        assert_eq!(dict.len(), 8);
    }

    #[test]
    fn large_algebras_are_lazy() {
        let ix = indexer(7, 0, 0);
        let dict = BladeDict::new(&ix, false);
        assert!(dict.is_lazy());
        assert_eq!(dict.len(), 0);
        dict.get(&ix, "e12").unwrap();
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn lazy_and_eager_agree() {
        let ix_small = indexer(3, 0, 0);
        let eager = BladeDict::new(&ix_small, false);
        let ix_large = indexer(7, 0, 0);
        let lazy = BladeDict::new(&ix_large, false);
        // e12 has the same index and payload in both.
        let a = eager.get(&ix_small, "e12").unwrap();
        let b = lazy.get(&ix_large, "e12").unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn graded_payload_spans_the_grade_slice() {
        let ix = indexer(2, 0, 0);
        let dict = BladeDict::new(&ix, true);
        let e1 = dict.get(&ix, "e1").unwrap();
        assert_eq!(e1.keys, vec![1, 2]);
        assert_eq!(e1.values, vec![1.0, 0.0]);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let ix = indexer(2, 0, 0);
        let dict = BladeDict::new(&ix, false);
        assert!(dict.get(&ix, "e7").is_err());
    }
}
