// src/signature.rs
//! Signature resolution: turns constructor input, either `(p, q, r)` counts
//! or an explicit list of squares, into the canonical per-generator metric.

use crate::error::{AlgebraError, Result};

/// The resolved metric of an algebra: one square value per basis generator.
///
/// `values[i]` is the square of generator `i` and is always one of
/// `{+1, -1, 0}`. Generator ordering is fixed at construction: when `r == 1`
/// the single null generator comes first (the projective convention, giving
/// the distinguished "origin" direction `e0`), otherwise positive generators
/// precede negative precede null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    values: Vec<i8>,
    p: usize,
    q: usize,
    r: usize,
    start_index: u32,
}

impl Signature {
    /// Resolve from `(p, q, r)` counts, with an optional explicit signature
    /// and/or display start index.
    ///
    /// If `explicit` is given it wins: counts are tallied from it and the
    /// `(p, q, r)` arguments are ignored. Values outside `{1, -1, 0}` are a
    /// configuration error. The start index only affects blade-name digit
    /// rendering, never the algebra itself; it defaults to 0 when `r == 1`
    /// and 1 otherwise.
    pub fn resolve(
        p: usize,
        q: usize,
        r: usize,
        explicit: Option<&[i8]>,
        start_index: Option<u32>,
    ) -> Result<Self> {
        let (values, p, q, r) = match explicit {
            Some(sig) => {
                let mut counts = (0usize, 0usize, 0usize);
                for &s in sig {
                    match s {
                        1 => counts.0 += 1,
                        -1 => counts.1 += 1,
                        0 => counts.2 += 1,
                        other => {
                            return Err(AlgebraError::Configuration(format!(
                                "signature value {other} is not in {{1, -1, 0}}"
                            )))
                        }
                    }
                }
                (sig.to_vec(), counts.0, counts.1, counts.2)
            }
            None => {
                let mut values = Vec::with_capacity(p + q + r);
                if r == 1 {
                    values.push(0);
                    values.extend(std::iter::repeat(1).take(p));
                    values.extend(std::iter::repeat(-1).take(q));
                } else {
                    values.extend(std::iter::repeat(1).take(p));
                    values.extend(std::iter::repeat(-1).take(q));
                    values.extend(std::iter::repeat(0).take(r));
                }
                (values, p, q, r)
            }
        };

        let start_index = start_index.unwrap_or(if r == 1 { 0 } else { 1 });
        let d = values.len();
        // Every generator must render as a single hex digit.
        if d as u32 + start_index > 16 {
            return Err(AlgebraError::Configuration(format!(
                "{d} generators starting at index {start_index} exceed single-digit names"
            )));
        }

        Ok(Self { values, p, q, r, start_index })
    }

    /// Total number of generators, `p + q + r`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// Square of generator `i` (0-based position, not display digit).
    #[inline]
    pub fn square(&self, i: usize) -> i8 {
        self.values[i]
    }

    /// The full per-generator square sequence.
    #[inline]
    pub fn values(&self) -> &[i8] {
        &self.values
    }

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn q(&self) -> usize {
        self.q
    }

    pub fn r(&self) -> usize {
        self.r
    }

    /// Display digit offset for blade names.
    #[inline]
    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    /// Display digit (hex char) of generator `i`.
    ///
    /// Always in range: `resolve` rejects signatures where
    /// `dim + start_index` exceeds 16.
    #[inline]
    pub fn digit(&self, i: usize) -> char {
        char::from_digit(i as u32 + self.start_index, 16)
            .expect("generator digit fits a hex char")
    }
}
