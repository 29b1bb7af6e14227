// src/cayley.rs
//! Cayley table derivation: for every ordered pair of basis blades, count the
//! adjacent transpositions needed to sort their concatenated generator word,
//! fold repeated generators through the signature, and emit sign/swap tables
//! plus the symbolic multiplication table.

use smallvec::SmallVec;

use crate::blades::BladeIndexer;
use crate::signature::Signature;

/// A generator word: generator positions in product order, length ≤ 2d.
type Word = SmallVec<[u8; 8]>;

/// One entry of the symbolic Cayley table: `eI * eJ` is either zero or a
/// signed basis blade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CayleyEntry {
    Zero,
    Blade { sign: i8, index: usize },
}

impl CayleyEntry {
    /// Render the entry the way the table is displayed: `0`, `e12`, `-e13`.
    pub fn display(&self, indexer: &BladeIndexer) -> String {
        match *self {
            CayleyEntry::Zero => "0".to_string(),
            CayleyEntry::Blade { sign, index } => {
                let name = indexer.name(index);
                if sign < 0 {
                    format!("-{name}")
                } else {
                    name.to_string()
                }
            }
        }
    }
}

/// Dense multiplication structure over all `2^d × 2^d` ordered blade pairs.
///
/// This is the single source of truth for every downstream product and
/// contraction: multiplying general multivectors is bilinear extension over
/// these entries.
#[derive(Debug)]
pub struct CayleyTable {
    n: usize,
    /// Raw adjacent-transposition counts, row-major `[eI * n + eJ]`.
    swaps: Vec<u32>,
    /// Signs in {-1, 0, 1}, same indexing.
    signs: Vec<i8>,
    entries: Vec<CayleyEntry>,
}

impl CayleyTable {
    pub fn build(signature: &Signature, indexer: &BladeIndexer) -> Self {
        let n = indexer.len();
        let mut swaps = vec![0u32; n * n];
        let mut signs = vec![0i8; n * n];
        let mut entries = vec![CayleyEntry::Zero; n * n];

        for left in 0..n {
            for right in 0..n {
                let (swap_count, entry) = blade_product(signature, left, right);
                let cell = left * n + right;
                swaps[cell] = swap_count;
                signs[cell] = match entry {
                    CayleyEntry::Zero => 0,
                    CayleyEntry::Blade { sign, .. } => sign,
                };
                entries[cell] = entry;
            }
        }

        Self { n, swaps, signs, entries }
    }

    /// Number of blades per axis, `2^d`.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// The product `eI * eJ` as a symbolic entry.
    #[inline]
    pub fn entry(&self, left: usize, right: usize) -> CayleyEntry {
        self.entries[left * self.n + right]
    }

    /// Sign of `eI * eJ`, in {-1, 0, 1}. Diagnostic companion to `entry`.
    #[inline]
    pub fn sign(&self, left: usize, right: usize) -> i8 {
        self.signs[left * self.n + right]
    }

    /// Raw swap count for `eI * eJ`, before signature folding.
    #[inline]
    pub fn swaps(&self, left: usize, right: usize) -> u32 {
        self.swaps[left * self.n + right]
    }
}

/// Multiply the basis blades with bitmasks `left` and `right`.
///
/// Returns the raw swap count alongside the resulting entry. The word length
/// is at most `2d`, so the bubble-pass counter below is never the bottleneck;
/// only the swap parity and the sorted word are observable.
fn blade_product(signature: &Signature, left: usize, right: usize) -> (u32, CayleyEntry) {
    let mut word: Word = Word::new();
    for bit in 0..signature.dim() {
        if left >> bit & 1 != 0 {
            word.push(bit as u8);
        }
    }
    for bit in 0..signature.dim() {
        if right >> bit & 1 != 0 {
            word.push(bit as u8);
        }
    }

    let swap_count = sort_word(&mut word);
    let mut sign: i8 = if swap_count % 2 == 1 { -1 } else { 1 };

    // Collapse even powers: each adjacent equal pair in the sorted word is a
    // squared generator and contributes its signature value to the sign.
    let mut result_index = 0usize;
    let mut i = 0;
    while i < word.len() {
        let gen = word[i] as usize;
        if i + 1 < word.len() && word[i + 1] as usize == gen {
            sign *= signature.square(gen);
            i += 2;
        } else {
            result_index |= 1 << gen;
            i += 1;
        }
    }

    let entry = if sign == 0 {
        CayleyEntry::Zero
    } else {
        CayleyEntry::Blade { sign, index: result_index }
    };
    (swap_count, entry)
}

/// Sort a generator word in place with full bubble passes, counting adjacent
/// transpositions. Each swap exchanges two anticommuting orthogonal
/// generators and therefore flips the product's sign once.
fn sort_word(word: &mut Word) -> u32 {
    let mut swaps = 0u32;
    if word.len() < 2 {
        return swaps;
    }
    loop {
        let before = swaps;
        for i in 0..word.len() - 1 {
            if word[i] > word[i + 1] {
                word.swap(i, i + 1);
                swaps += 1;
            }
        }
        if swaps == before {
            return swaps;
        }
    }
}
