// src/graph.rs
//! Serialization boundary for external visualizers.
//!
//! Rendering itself (ganja.js-style interactive graphs) lives outside this
//! crate; the engine's only obligations are to hand over the metric and the
//! Cayley table in a serializable form and to flatten collections of
//! multivectors into a flat subject list.

use serde::{Deserialize, Serialize};

use crate::algebra::Algebra;
use crate::multivector::Multivector;

/// The algebra data an external graphing engine consumes.
///
/// Rows and columns follow the canonical (grade, then lexicographic) basis
/// order; `cayley[j][i]` is the product of the j-th and i-th canonical
/// blades. The scalar blade renders as `"1"` rather than the bare `"e"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphData {
    pub metric: Vec<i8>,
    pub cayley: Vec<Vec<String>>,
}

impl GraphData {
    pub fn from_algebra(algebra: &Algebra) -> Self {
        let indexer = algebra.indexer();
        let order = indexer.canonical_order();
        let cayley = order
            .iter()
            .map(|&left| {
                order
                    .iter()
                    .map(|&right| {
                        let cell = algebra.cayley().entry(left, right).display(indexer);
                        match cell.as_str() {
                            "e" => "1".to_string(),
                            "-e" => "-1".to_string(),
                            _ => cell,
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            metric: algebra.signature().values().to_vec(),
            cayley,
        }
    }
}

/// One graphable subject: a multivector, a collection of them, a text label,
/// or a hex color directive.
#[derive(Debug, Clone)]
pub enum Subject<'a> {
    Multivector(Multivector<'a>),
    Multivectors(Vec<Multivector<'a>>),
    Label(String),
    Color(u32),
}

/// Flatten subjects so every multivector collection becomes a run of single
/// multivectors, in order.
pub fn flatten_subjects<'a>(subjects: Vec<Subject<'a>>) -> Vec<Subject<'a>> {
    let mut flat = Vec::with_capacity(subjects.len());
    for subject in subjects {
        match subject {
            Subject::Multivectors(mvs) => {
                flat.extend(mvs.into_iter().map(Subject::Multivector));
            }
            other => flat.push(other),
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_data_renders_scalar_cells_as_one() {
        let alg = Algebra::new(2, 0, 0).unwrap();
        let data = GraphData::from_algebra(&alg);
        assert_eq!(data.metric, vec![1, 1]);
        // Canonical order: e, e1, e2, e12.
        assert_eq!(data.cayley[0][0], "1");
        assert_eq!(data.cayley[1][1], "1");
        assert_eq!(data.cayley[3][3], "-1");
        assert_eq!(data.cayley[1][2], "e12");
        assert_eq!(data.cayley[2][1], "-e12");
    }

    #[test]
    fn flattening_splits_collections() {
        let alg = Algebra::new(2, 0, 0).unwrap();
        let a = alg.scalar(1.0);
        let b = alg.scalar(2.0);
        let flat = flatten_subjects(vec![
            Subject::Color(0xD0FFE1),
            Subject::Multivectors(vec![a, b]),
            Subject::Label("A".into()),
        ]);
        assert_eq!(flat.len(), 4);
        assert!(matches!(flat[1], Subject::Multivector(_)));
        assert!(matches!(flat[2], Subject::Multivector(_)));
    }
}
