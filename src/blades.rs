// src/blades.rs
//! Blade indexing: the bijection between binary blade indices (bitmasks over
//! generators) and canonical string names, plus grade bookkeeping.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AlgebraError, Result};
use crate::signature::Signature;

/// Index ↔ name bijection and grade partition for a `2^d`-blade basis.
///
/// Canonical names are `"e"` followed by the display digits of the selected
/// generators, low bit to high (digits therefore ascend); the scalar is the
/// bare `"e"`. The canonical *listing* order sorts names by length (grade)
/// first, then lexicographically; this is the externally visible order of
/// the algebra's basis elements.
#[derive(Debug)]
pub struct BladeIndexer {
    dim: usize,
    bin2canon: Vec<String>,
    canon2bin: HashMap<String, usize>,
    /// Blade indices in canonical (grade, lexicographic) listing order.
    canonical_order: Vec<usize>,
    /// `indices_for_grade[g]` = ascending blade indices of popcount `g`.
    indices_for_grade: Vec<Vec<usize>>,
    /// Memo for grade-subset unions; populated on first request per tuple.
    grades_memo: Mutex<HashMap<Vec<usize>, Arc<Vec<usize>>>>,
}

impl BladeIndexer {
    pub fn new(signature: &Signature) -> Self {
        let dim = signature.dim();
        let n = 1usize << dim;

        let mut bin2canon = Vec::with_capacity(n);
        let mut canon2bin = HashMap::with_capacity(n);
        for index in 0..n {
            let mut name = String::from("e");
            for bit in 0..dim {
                if index >> bit & 1 != 0 {
                    name.push(signature.digit(bit));
                }
            }
            canon2bin.insert(name.clone(), index);
            bin2canon.push(name);
        }

        let mut canonical_order: Vec<usize> = (0..n).collect();
        canonical_order.sort_by(|&a, &b| {
            let (na, nb) = (&bin2canon[a], &bin2canon[b]);
            na.len().cmp(&nb.len()).then_with(|| na.cmp(nb))
        });

        let mut indices_for_grade = vec![Vec::new(); dim + 1];
        for index in 0..n {
            indices_for_grade[index.count_ones() as usize].push(index);
        }

        Self {
            dim,
            bin2canon,
            canon2bin,
            canonical_order,
            indices_for_grade,
            grades_memo: Mutex::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of basis blades, `2^d`.
    #[inline]
    pub fn len(&self) -> usize {
        self.bin2canon.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bin2canon.is_empty()
    }

    /// Canonical name of a blade index.
    #[inline]
    pub fn name(&self, index: usize) -> &str {
        &self.bin2canon[index]
    }

    /// Blade index of a canonical name, or `UnknownBlade`.
    pub fn index(&self, name: &str) -> Result<usize> {
        self.canon2bin
            .get(name)
            .copied()
            .ok_or_else(|| AlgebraError::UnknownBlade(name.to_string()))
    }

    /// Blade indices in canonical (grade, then lexicographic) listing order.
    #[inline]
    pub fn canonical_order(&self) -> &[usize] {
        &self.canonical_order
    }

    /// Ascending blade indices of grade `g`. Empty for `g > d`.
    pub fn indices_for_grade(&self, grade: usize) -> &[usize] {
        self.indices_for_grade
            .get(grade)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Union of per-grade index sets, concatenated in the given grade order
    /// with duplicates dropped. Memoized per tuple: the full table over all
    /// non-empty grade subsets is `2^(d+1) - 1` entries, so it is built on
    /// demand rather than eagerly.
    pub fn indices_for_grades(&self, grades: &[usize]) -> Arc<Vec<usize>> {
        if let Some(hit) = self.grades_memo.lock().get(grades) {
            return Arc::clone(hit);
        }
        let mut seen = vec![false; self.dim + 1];
        let mut indices = Vec::new();
        for &g in grades {
            if g <= self.dim && !seen[g] {
                seen[g] = true;
                indices.extend_from_slice(self.indices_for_grade(g));
            }
        }
        let indices = Arc::new(indices);
        // A racing builder may have inserted meanwhile; both built the same
        // value, keep whichever landed first.
        Arc::clone(
            self.grades_memo
                .lock()
                .entry(grades.to_vec())
                .or_insert(indices),
        )
    }
}
