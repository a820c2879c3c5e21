//! # Crossover
//!
//! Produces offspring from parent tuples. Strategies form a closed
//! tagged-variant family; each variant carries its parameter tuple, so the
//! breeding loop dispatches on a plain enum instead of a callback.
//!
//! The point-based family cuts both parents at the same positions and
//! reassembles alternating segments. Strategies that rank children by
//! fitness receive a scoring closure from the evolution driver; the closure
//! routes through the cache-aware evaluator, so ranking children never
//! recomputes a known score.
//!
//! For variable-length chromosomes, cut points are drawn against the
//! shorter parent's effective length. The child inherits the hole prefix of
//! the parent that supplies its first segment, and the parent that supplies
//! the final segment controls the tail: a longer final-segment parent
//! extends the child, a shorter one trims it.

mod permutation;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chromosome::{Chromosome, Genome};
use crate::error::{GeneticError, Result};
use crate::rng::{Distribution, RandomNumberGenerator};

/// Largest admissible cut-point count for the exhaustive
/// [`CrossoverStrategy::PointsSimple`] enumeration; `n` points enumerate
/// `2^(n+1)` segment assignments.
const MAX_SIMPLE_POINTS: usize = 16;

/// Scoring closure supplied by the evolution driver for strategies that
/// rank candidates by fitness.
pub type ScoreFn<'a> = &'a mut dyn FnMut(&Chromosome) -> Result<f64>;

/// A crossover strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrossoverStrategy {
    /// Choose `n` distinct cut points, enumerate every assignment of the
    /// `n + 1` segments to the two parents, and keep the single best child
    /// by fitness rank.
    PointsSimple(usize),
    /// `n`-point split-and-swap producing two children; return one of them
    /// chosen uniformly at random.
    PointsBasic(usize),
    /// Like `PointsBasic`, but return the fitter of the two children (ties
    /// go to the first).
    Points(usize),
    /// Produce both children, then return the best of parents and children
    /// by fitness rank.
    PointsAdvanced(usize),
    /// Cut points are drawn from the given probability distribution over
    /// `[1, L-1]`; the point count is the distribution's natural count
    /// parameter (1 where ambiguous). Otherwise behaves like `Points`.
    Distribution(Distribution),
    /// Partially mapped crossover for combination genomes.
    Pmx,
    /// Order crossover for combination genomes.
    Ox,
}

impl CrossoverStrategy {
    /// Checks strategy parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::PointsSimple(n) => {
                if *n == 0 || *n > MAX_SIMPLE_POINTS {
                    return Err(GeneticError::Configuration(format!(
                        "PointsSimple requires a cut count in 1..={}, got {}",
                        MAX_SIMPLE_POINTS, n
                    )));
                }
                Ok(())
            }
            Self::PointsBasic(n) | Self::Points(n) | Self::PointsAdvanced(n) => {
                if *n == 0 {
                    return Err(GeneticError::Configuration(
                        "Point-based crossover requires at least one cut point".to_string(),
                    ));
                }
                Ok(())
            }
            Self::Distribution(d) => d.validate(),
            Self::Pmx | Self::Ox => Ok(()),
        }
    }

    /// Checks that the strategy fits the genome: the permutation operators
    /// require a combination genome, and the point-based operators would
    /// break the permutation invariant.
    pub(crate) fn check_compatible(&self, genome: &Genome) -> Result<()> {
        match (self, genome.is_combination()) {
            (Self::Pmx | Self::Ox, false) => Err(GeneticError::Configuration(
                "PMX and OX crossover require a combination genome".to_string(),
            )),
            (Self::Pmx | Self::Ox, true) => Ok(()),
            (_, true) => Err(GeneticError::Configuration(
                "Point-based crossover does not preserve permutations; \
                 use PMX or OX for combination genomes"
                    .to_string(),
            )),
            (_, false) => Ok(()),
        }
    }

    /// Produces one child from the parent tuple.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` for fewer than two parents
    /// and propagates scoring failures from fitness-ranking strategies.
    pub fn breed(
        &self,
        parents: &[&Chromosome],
        genome: &Genome,
        rng: &mut RandomNumberGenerator,
        score: ScoreFn,
    ) -> Result<Chromosome> {
        if parents.len() < 2 {
            return Err(GeneticError::EmptyPopulation);
        }
        let (p0, p1) = (parents[0], parents[1]);

        match self {
            Self::PointsSimple(n) => {
                let cuts = draw_cuts(*n, p0, p1, rng);
                best_segment_assignment(genome, p0, p1, &cuts, score)
            }
            Self::PointsBasic(n) => {
                let (a, b) = split_and_swap(genome, p0, p1, &draw_cuts(*n, p0, p1, rng));
                Ok(if rng.rng.gen_bool(0.5) { a } else { b })
            }
            Self::Points(n) => {
                let (a, b) = split_and_swap(genome, p0, p1, &draw_cuts(*n, p0, p1, rng));
                fitter_of(a, b, score)
            }
            Self::PointsAdvanced(n) => {
                let (a, b) = split_and_swap(genome, p0, p1, &draw_cuts(*n, p0, p1, rng));
                let mut best = p0.clone();
                let mut best_score = score(&best)?;
                for candidate in [p1.clone(), a, b] {
                    let candidate_score = score(&candidate)?;
                    if candidate_score > best_score {
                        best = candidate;
                        best_score = candidate_score;
                    }
                }
                Ok(best)
            }
            Self::Distribution(distribution) => {
                let cuts = draw_cuts_from_distribution(distribution, p0, p1, rng)?;
                let (a, b) = split_and_swap(genome, p0, p1, &cuts);
                fitter_of(a, b, score)
            }
            Self::Pmx => Ok(permutation::pmx(p0, p1, genome, rng)),
            Self::Ox => Ok(permutation::ox(p0, p1, genome, rng)),
        }
    }
}

fn fitter_of(a: Chromosome, b: Chromosome, score: ScoreFn) -> Result<Chromosome> {
    let score_a = score(&a)?;
    let score_b = score(&b)?;
    Ok(if score_b > score_a { b } else { a })
}

/// The absolute position window where both parents are defined.
fn overlap(p0: &Chromosome, p1: &Chromosome) -> (usize, usize) {
    let start = p0.holes().max(p1.holes());
    let end = p0.len().min(p1.len());
    (start, end.max(start))
}

/// Draws `count` distinct cut points, clamped to the shorter parent's
/// effective length, as absolute positions sorted ascending.
fn draw_cuts(
    count: usize,
    p0: &Chromosome,
    p1: &Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Vec<usize> {
    let (start, end) = overlap(p0, p1);
    let span = end - start;
    if span < 2 {
        return Vec::new();
    }
    let count = count.min(span - 1);
    let mut cuts: Vec<usize> = rand::seq::index::sample(&mut rng.rng, span - 1, count)
        .into_iter()
        .map(|offset| start + offset + 1)
        .collect();
    cuts.sort_unstable();
    cuts
}

/// Draws distinct cut points through a probability distribution; any
/// shortfall after repeated collisions is filled uniformly.
fn draw_cuts_from_distribution(
    distribution: &Distribution,
    p0: &Chromosome,
    p1: &Chromosome,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<usize>> {
    let (start, end) = overlap(p0, p1);
    let span = end - start;
    if span < 2 {
        return Ok(Vec::new());
    }
    let count = distribution.point_count().unwrap_or(1).min(span - 1);

    let mut cuts: Vec<usize> = Vec::with_capacity(count);
    let mut attempts = 0;
    while cuts.len() < count && attempts < 16 * count {
        let cut = start + 1 + distribution.sample_index(span - 1, rng)?;
        if !cuts.contains(&cut) {
            cuts.push(cut);
        }
        attempts += 1;
    }
    if cuts.len() < count {
        let mut remaining: Vec<usize> =
            (start + 1..end).filter(|p| !cuts.contains(p)).collect();
        remaining.shuffle(&mut rng.rng);
        cuts.extend(remaining.into_iter().take(count - cuts.len()));
    }
    cuts.sort_unstable();
    Ok(cuts)
}

/// Classic split-and-swap: both children from the same cut positions, child
/// A rooted in parent 0 and child B in parent 1.
fn split_and_swap(
    genome: &Genome,
    p0: &Chromosome,
    p1: &Chromosome,
    cuts: &[usize],
) -> (Chromosome, Chromosome) {
    let owners: Vec<bool> = (0..cuts.len() + 1).map(|segment| segment % 2 == 1).collect();
    (
        splice(genome, p0, p1, cuts, &owners),
        splice(genome, p1, p0, cuts, &owners),
    )
}

/// Builds one child: a copy of `base` with the donor's genes written into
/// the segments assigned to the donor, plus the tail rule for unequal
/// lengths.
fn splice(
    genome: &Genome,
    base: &Chromosome,
    donor: &Chromosome,
    cuts: &[usize],
    donor_segments: &[bool],
) -> Chromosome {
    let holes = base.holes();
    let mut codes = base.codes();
    let (start, end) = overlap(base, donor);

    let mut bounds = Vec::with_capacity(cuts.len() + 2);
    bounds.push(start);
    bounds.extend_from_slice(cuts);
    bounds.push(end);

    for (segment, window) in bounds.windows(2).enumerate() {
        if donor_segments[segment] {
            for position in window[0]..window[1] {
                codes[position - holes] = donor.code(position - donor.holes());
            }
        }
    }

    // The parent supplying the final segment controls the tail.
    if donor_segments[donor_segments.len() - 1] && donor.len() != base.len() {
        if donor.len() > base.len() {
            for position in end..donor.len() {
                codes.push(donor.code(position - donor.holes()));
            }
        } else {
            let keep = donor.len().saturating_sub(holes).max(1);
            codes.truncate(keep);
        }
    }

    genome.chromosome_from_codes(&codes, holes)
}

/// Enumerates every segment-to-parent assignment for the given cuts and
/// returns the best-scoring child.
fn best_segment_assignment(
    genome: &Genome,
    p0: &Chromosome,
    p1: &Chromosome,
    cuts: &[usize],
    score: ScoreFn,
) -> Result<Chromosome> {
    let segments = cuts.len() + 1;
    let mut best: Option<(Chromosome, f64)> = None;

    for mask in 0u32..(1u32 << segments) {
        let base_is_p1 = mask & 1 == 1;
        let (base, donor) = if base_is_p1 { (p1, p0) } else { (p0, p1) };
        let donor_segments: Vec<bool> = (0..segments)
            .map(|segment| ((mask >> segment) & 1 == 1) != base_is_p1)
            .collect();
        let child = splice(genome, base, donor, cuts, &donor_segments);
        let child_score = score(&child)?;
        match &best {
            Some((_, best_score)) if *best_score >= child_score => {}
            _ => best = Some((child, child_score)),
        }
    }

    best.map(|(child, _)| child)
        .ok_or_else(|| GeneticError::Crossover("No segment assignment produced a child".to_string()))
}
