//! # Mutation
//!
//! Per-gene mutation plus variable-length growth and shrink. The per-gene
//! rule depends on the gene type: bits flip, list and range genes redraw
//! uniformly from their position's domain (distinct from the current value
//! whenever the domain allows it), and combination genes swap places with
//! another uniformly chosen position, which keeps the permutation intact.
//!
//! Variable-length chromosomes additionally grow or shrink by one gene with
//! a secondary probability equal to the per-gene probability: growth appends
//! a legal gene on the right, shrink drops from the right edge (level 1) or
//! from either edge (level 2), where a left-edge drop extends the hole
//! prefix.

use rand::Rng;

use crate::chromosome::{Chromosome, Genome, VariableLength};
use crate::rng::RandomNumberGenerator;

/// Applies per-gene mutation at a fixed probability.
#[derive(Debug, Clone, Copy)]
pub struct Mutator {
    probability: f64,
}

impl Mutator {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    /// Mutates the chromosome in place.
    pub fn mutate(
        &self,
        chromosome: &mut Chromosome,
        genome: &Genome,
        rng: &mut RandomNumberGenerator,
    ) {
        if self.probability <= 0.0 {
            return;
        }

        let defined = chromosome.defined_len();
        if genome.is_combination() {
            for i in 0..defined {
                if rng.rng.gen_bool(self.probability) {
                    let j = rng.rng.gen_range(0..defined);
                    chromosome.swap_codes(i, j);
                }
            }
            return;
        }

        let holes = chromosome.holes();
        for i in 0..defined {
            if rng.rng.gen_bool(self.probability) {
                let card = genome.domain_card(holes + i);
                if card < 2 {
                    continue;
                }
                // Uniform over the domain minus the current value; for bits
                // this is exactly a flip.
                let current = chromosome.code(i);
                let mut replacement = rng.rng.gen_range(0..card - 1);
                if replacement >= current {
                    replacement += 1;
                }
                chromosome.set_code(i, replacement);
            }
        }

        if genome.variable_length() != VariableLength::Fixed
            && rng.rng.gen_bool(self.probability)
        {
            self.resize(chromosome, genome, rng);
        }
    }

    /// Grows or shrinks the chromosome by one gene, each direction chosen
    /// with equal probability; an impossible direction falls through to the
    /// other, and a chromosome that can do neither is left alone.
    fn resize(
        &self,
        chromosome: &mut Chromosome,
        genome: &Genome,
        rng: &mut RandomNumberGenerator,
    ) {
        let can_grow = chromosome.len() < genome.max_length();
        let can_shrink = chromosome.defined_len() > 1;
        let grow = match (can_grow, can_shrink) {
            (true, true) => rng.rng.gen_bool(0.5),
            (true, false) => true,
            (false, true) => false,
            (false, false) => return,
        };

        if grow {
            let position = chromosome.len();
            let code = rng.rng.gen_range(0..genome.domain_card(position));
            chromosome.push_code(code);
        } else if genome.variable_length() == VariableLength::BothEdges && rng.rng.gen_bool(0.5) {
            chromosome.shrink_left();
        } else {
            chromosome.pop_code();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{GenomeSpec, VariableLength};

    #[test]
    fn test_certain_mutation_flips_every_bit() {
        let genome = Genome::new(GenomeSpec::Bit { length: 16 }, VariableLength::Fixed).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut chromosome = genome.chromosome_from_codes(&[0; 16], 0);

        Mutator::new(1.0).mutate(&mut chromosome, &genome, &mut rng);
        for i in 0..16 {
            assert_eq!(chromosome.get(i), Some(1));
        }
    }

    #[test]
    fn test_zero_probability_is_a_no_op() {
        let genome = Genome::new(GenomeSpec::Bit { length: 16 }, VariableLength::Fixed).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let original = genome.random(&mut rng);
        let mut chromosome = original.clone();

        Mutator::new(0.0).mutate(&mut chromosome, &genome, &mut rng);
        assert_eq!(chromosome, original);
    }

    #[test]
    fn test_range_mutation_stays_in_bounds() {
        let genome = Genome::new(
            GenomeSpec::Range {
                bounds: vec![(-4, 4); 8],
            },
            VariableLength::Fixed,
        )
        .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);

        for _ in 0..50 {
            let mut chromosome = genome.random(&mut rng);
            Mutator::new(0.5).mutate(&mut chromosome, &genome, &mut rng);
            genome.validate(&chromosome).unwrap();
        }
    }

    #[test]
    fn test_combination_mutation_preserves_the_permutation() {
        let genome = Genome::new(
            GenomeSpec::Combination {
                alphabet: (0..12).map(|i| format!("s{}", i)).collect(),
            },
            VariableLength::Fixed,
        )
        .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(4);

        for _ in 0..50 {
            let mut chromosome = genome.random(&mut rng);
            Mutator::new(0.5).mutate(&mut chromosome, &genome, &mut rng);
            genome.validate(&chromosome).unwrap();
        }
    }

    #[test]
    fn test_variable_length_mutation_respects_bounds() {
        let genome = Genome::new(GenomeSpec::Bit { length: 6 }, VariableLength::BothEdges).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut chromosome = genome.random(&mut rng);

        for _ in 0..200 {
            Mutator::new(0.8).mutate(&mut chromosome, &genome, &mut rng);
            assert!(chromosome.defined_len() >= 1);
            assert!(chromosome.len() <= 6);
            genome.validate(&chromosome).unwrap();
        }
    }

    #[test]
    fn test_right_edge_level_never_creates_holes() {
        let genome = Genome::new(GenomeSpec::Bit { length: 6 }, VariableLength::RightEdge).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(6);
        let mut chromosome = genome.random(&mut rng);

        for _ in 0..200 {
            Mutator::new(0.8).mutate(&mut chromosome, &genome, &mut rng);
            assert_eq!(chromosome.holes(), 0);
            genome.validate(&chromosome).unwrap();
        }
    }
}
