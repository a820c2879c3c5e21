//! # Chromosome Codec
//!
//! Compact, type-specialised chromosome storage. Bit genomes pack one gene
//! per bit into `u64` words; list, range, and combination genomes store
//! alphabet/offset indices in the narrowest unsigned integer that covers the
//! widest per-position domain. Per-gene access is O(1) and copying is O(L).
//!
//! A chromosome knows nothing about its gene domains; the [`Genome`] built at
//! `init` carries the per-position alphabets and bounds and performs all
//! encoding, decoding, and validation.
//!
//! Variable-length chromosomes keep their missing leading positions as a
//! *hole prefix*: a counter of absent positions in front of the stored genes.
//! Trailing positions are never holes.

mod genome;

pub use genome::{GeneValue, Genome, GenomeSpec};

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// How a chromosome's effective length may change across generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariableLength {
    /// Length is fixed at the genome length.
    #[default]
    Fixed,
    /// Length may shrink or grow on the right edge only.
    RightEdge,
    /// Length may shrink or grow on either edge; missing leading positions
    /// become a hole prefix.
    BothEdges,
}

/// Backing storage for a chromosome's gene codes.
///
/// The variant is fixed per genome: every chromosome of a run carries the
/// same storage kind, so equality and hashing never compare across kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) enum GeneStore {
    Bits { words: Vec<u64>, len: usize },
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl GeneStore {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Bits { len, .. } => *len,
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub(crate) fn get(&self, index: usize) -> u64 {
        match self {
            Self::Bits { words, .. } => (words[index >> 6] >> (index & 63)) & 1,
            Self::U8(v) => v[index] as u64,
            Self::U16(v) => v[index] as u64,
            Self::U32(v) => v[index] as u64,
        }
    }

    pub(crate) fn set(&mut self, index: usize, code: u64) {
        match self {
            Self::Bits { words, .. } => {
                if code & 1 == 1 {
                    words[index >> 6] |= 1 << (index & 63);
                } else {
                    words[index >> 6] &= !(1 << (index & 63));
                }
            }
            Self::U8(v) => v[index] = code as u8,
            Self::U16(v) => v[index] = code as u16,
            Self::U32(v) => v[index] = code as u32,
        }
    }

    pub(crate) fn push(&mut self, code: u64) {
        match self {
            Self::Bits { words, len } => {
                if *len & 63 == 0 {
                    words.push(0);
                }
                if code & 1 == 1 {
                    words[*len >> 6] |= 1 << (*len & 63);
                }
                *len += 1;
            }
            Self::U8(v) => v.push(code as u8),
            Self::U16(v) => v.push(code as u16),
            Self::U32(v) => v.push(code as u32),
        }
    }

    pub(crate) fn pop(&mut self) {
        match self {
            Self::Bits { words, len } => {
                if *len == 0 {
                    return;
                }
                *len -= 1;
                words[*len >> 6] &= !(1 << (*len & 63));
                words.truncate((*len + 63) >> 6);
            }
            Self::U8(v) => {
                v.pop();
            }
            Self::U16(v) => {
                v.pop();
            }
            Self::U32(v) => {
                v.pop();
            }
        }
    }

    pub(crate) fn remove_first(&mut self) {
        match self {
            Self::Bits { words, len } => {
                if *len == 0 {
                    return;
                }
                for w in 0..words.len() {
                    let carry = if w + 1 < words.len() {
                        words[w + 1] & 1
                    } else {
                        0
                    };
                    words[w] = (words[w] >> 1) | (carry << 63);
                }
                *len -= 1;
                words.truncate((*len + 63) >> 6);
            }
            Self::U8(v) => {
                v.remove(0);
            }
            Self::U16(v) => {
                v.remove(0);
            }
            Self::U32(v) => {
                v.remove(0);
            }
        }
    }

    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        match self {
            Self::Bits { .. } => {
                let a = self.get(i);
                let b = self.get(j);
                self.set(i, b);
                self.set(j, a);
            }
            Self::U8(v) => v.swap(i, j),
            Self::U16(v) => v.swap(i, j),
            Self::U32(v) => v.swap(i, j),
        }
    }
}

/// A single candidate solution: an ordered sequence of compactly stored
/// gene codes plus a hole-prefix counter.
///
/// Positions `0..holes()` are holes; positions `holes()..len()` hold the
/// stored genes. Fixed-length chromosomes always have an empty hole prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chromosome {
    store: GeneStore,
    holes: usize,
}

impl Chromosome {
    pub(crate) fn from_store(store: GeneStore, holes: usize) -> Self {
        Self { store, holes }
    }

    /// Total number of positions, holes included.
    pub fn len(&self) -> usize {
        self.holes + self.store.len()
    }

    /// `true` when the chromosome holds no positions at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored (non-hole) genes.
    pub fn defined_len(&self) -> usize {
        self.store.len()
    }

    /// Length of the hole prefix.
    pub fn holes(&self) -> usize {
        self.holes
    }

    /// The raw gene code at an absolute position, or `None` for a hole or an
    /// out-of-range position.
    pub fn get(&self, position: usize) -> Option<u64> {
        if position < self.holes || position >= self.len() {
            None
        } else {
            Some(self.store.get(position - self.holes))
        }
    }

    /// A compact content key for the fitness cache.
    ///
    /// Two chromosomes compare equal exactly when their fingerprints are
    /// computed over identical storage, so a fingerprint collision between
    /// distinct chromosomes is as unlikely as a 64-bit hash collision.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    pub(crate) fn code(&self, defined_index: usize) -> u64 {
        self.store.get(defined_index)
    }

    pub(crate) fn set_code(&mut self, defined_index: usize, code: u64) {
        self.store.set(defined_index, code);
    }

    pub(crate) fn push_code(&mut self, code: u64) {
        self.store.push(code);
    }

    pub(crate) fn pop_code(&mut self) {
        self.store.pop();
    }

    /// Drops the leftmost stored gene and extends the hole prefix.
    pub(crate) fn shrink_left(&mut self) {
        self.store.remove_first();
        self.holes += 1;
    }

    pub(crate) fn swap_codes(&mut self, i: usize, j: usize) {
        self.store.swap(i, j);
    }

    /// All stored gene codes in order, holes excluded.
    pub(crate) fn codes(&self) -> Vec<u64> {
        (0..self.store.len()).map(|i| self.store.get(i)).collect()
    }
}
