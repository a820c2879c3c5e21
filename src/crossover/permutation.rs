//! Permutation-preserving crossover operators for combination genomes.
//!
//! Both operators pick a random window `[a, b)` and rebuild a child that is
//! guaranteed to remain a permutation: PMX preserves absolute positions
//! through a swap chain, OX preserves the relative order of the second
//! parent outside the inherited window.

use rand::Rng;

use crate::chromosome::{Chromosome, Genome};
use crate::rng::RandomNumberGenerator;

/// Partially mapped crossover.
///
/// The child starts as a copy of parent 0. For each window position, the
/// gene parent 1 holds there is swapped into place from wherever the child
/// currently keeps it, so every swap leaves the child a permutation.
pub(crate) fn pmx(
    p0: &Chromosome,
    p1: &Chromosome,
    genome: &Genome,
    rng: &mut RandomNumberGenerator,
) -> Chromosome {
    let n = p0.defined_len();
    if n < 2 {
        return p0.clone();
    }
    let (a, b) = window(n, rng);

    let mut codes = p0.codes();
    let mut position_of = vec![0usize; n];
    for (position, &code) in codes.iter().enumerate() {
        position_of[code as usize] = position;
    }

    for i in a..b {
        let wanted = p1.code(i);
        let j = position_of[wanted as usize];
        if i != j {
            let displaced = codes[i];
            codes.swap(i, j);
            position_of[wanted as usize] = i;
            position_of[displaced as usize] = j;
        }
    }

    genome.chromosome_from_codes(&codes, 0)
}

/// Order crossover.
///
/// The child inherits parent 0's window directly; the remaining positions
/// are filled by walking parent 1 from the window's end, wrapping around
/// and skipping genes already placed.
pub(crate) fn ox(
    p0: &Chromosome,
    p1: &Chromosome,
    genome: &Genome,
    rng: &mut RandomNumberGenerator,
) -> Chromosome {
    let n = p0.defined_len();
    if n < 2 {
        return p0.clone();
    }
    let (a, b) = window(n, rng);

    let mut codes = vec![0u64; n];
    let mut placed = vec![false; n];
    for i in a..b {
        codes[i] = p0.code(i);
        placed[p0.code(i) as usize] = true;
    }

    let fillers: Vec<u64> = (0..n)
        .map(|offset| p1.code((b + offset) % n))
        .filter(|&code| !placed[code as usize])
        .collect();
    let targets = (b..n).chain(0..a);
    for (position, code) in targets.zip(fillers) {
        codes[position] = code;
    }

    genome.chromosome_from_codes(&codes, 0)
}

/// A uniform window `[a, b)` with `a < b`, drawn as a distinct pair.
fn window(n: usize, rng: &mut RandomNumberGenerator) -> (usize, usize) {
    let i = rng.rng.gen_range(0..n);
    let mut j = rng.rng.gen_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i.min(j), i.max(j))
}
