//! Genome: the per-run decoding context for chromosomes.
//!
//! A [`Genome`] is built once at `init` from a [`GenomeSpec`] and owns the
//! per-position gene domains. All encoding, decoding, random creation, and
//! validation goes through it; chromosomes themselves are domain-blind
//! containers of packed codes.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Chromosome, GeneStore, VariableLength};
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Separator between gene tokens in the string rendering of a chromosome.
const TOKEN_SEPARATOR: &str = "___";

/// Rendering of a hole position in the string form.
const HOLE_TOKEN: &str = " ";

/// The structure handed to `init`: gene type plus per-position domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenomeSpec {
    /// Every gene is a single bit; `length` genes per chromosome.
    Bit { length: usize },
    /// Every gene is an index into its position's alphabet of labels.
    List { alphabets: Vec<Vec<String>> },
    /// Every gene is an integer within its position's inclusive bounds.
    Range { bounds: Vec<(i64, i64)> },
    /// The chromosome is a permutation of one global alphabet.
    Combination { alphabet: Vec<String> },
}

/// A decoded gene value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeneValue {
    Bit(bool),
    Symbol(String),
    Int(i64),
}

impl From<bool> for GeneValue {
    fn from(value: bool) -> Self {
        Self::Bit(value)
    }
}

impl From<i64> for GeneValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for GeneValue {
    fn from(value: &str) -> Self {
        Self::Symbol(value.to_string())
    }
}

impl From<String> for GeneValue {
    fn from(value: String) -> Self {
        Self::Symbol(value)
    }
}

/// Storage width for index-coded genes, chosen once per genome as the
/// narrowest unsigned integer covering the widest per-position domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum GeneWidth {
    Bit,
    U8,
    U16,
    U32,
}

/// The immutable decoding context shared by every chromosome of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    spec: GenomeSpec,
    width: GeneWidth,
    variable_length: VariableLength,
}

impl Genome {
    /// Builds the decoding context, validating the spec and selecting the
    /// storage width.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for an empty spec, an empty
    /// per-position alphabet, inverted range bounds, duplicate combination
    /// symbols, or a variable-length request on a combination genome.
    pub fn new(spec: GenomeSpec, variable_length: VariableLength) -> Result<Self> {
        let width = match &spec {
            GenomeSpec::Bit { length } => {
                if *length == 0 {
                    return Err(GeneticError::Configuration(
                        "Bit genome length must be at least 1".to_string(),
                    ));
                }
                GeneWidth::Bit
            }
            GenomeSpec::List { alphabets } => {
                if alphabets.is_empty() {
                    return Err(GeneticError::Configuration(
                        "List genome requires at least one position".to_string(),
                    ));
                }
                let mut widest = 0usize;
                for (position, alphabet) in alphabets.iter().enumerate() {
                    if alphabet.is_empty() {
                        return Err(GeneticError::Configuration(format!(
                            "List genome position {} has an empty alphabet",
                            position
                        )));
                    }
                    widest = widest.max(alphabet.len());
                }
                width_for(widest as u64)?
            }
            GenomeSpec::Range { bounds } => {
                if bounds.is_empty() {
                    return Err(GeneticError::Configuration(
                        "Range genome requires at least one position".to_string(),
                    ));
                }
                let mut widest = 0u64;
                for (position, &(lo, hi)) in bounds.iter().enumerate() {
                    if lo > hi {
                        return Err(GeneticError::Configuration(format!(
                            "Range genome position {} has inverted bounds [{}, {}]",
                            position, lo, hi
                        )));
                    }
                    widest = widest.max(hi.abs_diff(lo) + 1);
                }
                width_for(widest)?
            }
            GenomeSpec::Combination { alphabet } => {
                if alphabet.is_empty() {
                    return Err(GeneticError::Configuration(
                        "Combination genome requires a non-empty alphabet".to_string(),
                    ));
                }
                for (i, symbol) in alphabet.iter().enumerate() {
                    if alphabet[..i].contains(symbol) {
                        return Err(GeneticError::Configuration(format!(
                            "Combination alphabet contains duplicate symbol {:?}",
                            symbol
                        )));
                    }
                }
                if variable_length != VariableLength::Fixed {
                    return Err(GeneticError::Configuration(
                        "Variable-length chromosomes cannot preserve a permutation; \
                         combination genomes are always fixed-length"
                            .to_string(),
                    ));
                }
                width_for(alphabet.len() as u64)?
            }
        };

        Ok(Self {
            spec,
            width,
            variable_length,
        })
    }

    pub fn spec(&self) -> &GenomeSpec {
        &self.spec
    }

    pub fn variable_length(&self) -> VariableLength {
        self.variable_length
    }

    /// Maximum (and for fixed-length genomes, exact) chromosome length.
    pub fn max_length(&self) -> usize {
        match &self.spec {
            GenomeSpec::Bit { length } => *length,
            GenomeSpec::List { alphabets } => alphabets.len(),
            GenomeSpec::Range { bounds } => bounds.len(),
            GenomeSpec::Combination { alphabet } => alphabet.len(),
        }
    }

    pub(crate) fn is_combination(&self) -> bool {
        matches!(self.spec, GenomeSpec::Combination { .. })
    }

    /// Number of legal codes at an absolute position.
    pub(crate) fn domain_card(&self, position: usize) -> u64 {
        match &self.spec {
            GenomeSpec::Bit { .. } => 2,
            GenomeSpec::List { alphabets } => alphabets[position].len() as u64,
            GenomeSpec::Range { bounds } => {
                let (lo, hi) = bounds[position];
                hi.abs_diff(lo) + 1
            }
            GenomeSpec::Combination { alphabet } => alphabet.len() as u64,
        }
    }

    fn empty_store(&self) -> GeneStore {
        match self.width {
            GeneWidth::Bit => GeneStore::Bits {
                words: Vec::new(),
                len: 0,
            },
            GeneWidth::U8 => GeneStore::U8(Vec::new()),
            GeneWidth::U16 => GeneStore::U16(Vec::new()),
            GeneWidth::U32 => GeneStore::U32(Vec::new()),
        }
    }

    /// Packs raw codes into a chromosome of this genome's storage kind.
    pub(crate) fn chromosome_from_codes(&self, codes: &[u64], holes: usize) -> Chromosome {
        let mut store = self.empty_store();
        for &code in codes {
            store.push(code);
        }
        Chromosome::from_store(store, holes)
    }

    /// Creates a random chromosome respecting all invariants.
    ///
    /// Fixed-length genomes always fill every position; variable-length
    /// genomes draw the initial effective length uniformly from `1..=L`
    /// (with no hole prefix — holes only arise from left-edge shrink).
    pub fn random(&self, rng: &mut RandomNumberGenerator) -> Chromosome {
        let max = self.max_length();
        match &self.spec {
            GenomeSpec::Combination { alphabet } => {
                let mut codes: Vec<u64> = (0..alphabet.len() as u64).collect();
                codes.shuffle(&mut rng.rng);
                self.chromosome_from_codes(&codes, 0)
            }
            _ => {
                let length = match self.variable_length {
                    VariableLength::Fixed => max,
                    _ => rng.rng.gen_range(1..=max),
                };
                let codes: Vec<u64> = (0..length)
                    .map(|position| rng.rng.gen_range(0..self.domain_card(position)))
                    .collect();
                self.chromosome_from_codes(&codes, 0)
            }
        }
    }

    /// Encodes raw gene values into a chromosome, validating every gene.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidChromosome` when the value count is
    /// illegal for this genome or any value is outside its position's
    /// domain.
    pub fn encode(&self, values: &[GeneValue]) -> Result<Chromosome> {
        let max = self.max_length();
        let fixed = self.variable_length == VariableLength::Fixed;
        if values.is_empty()
            || values.len() > max
            || (fixed && values.len() != max)
        {
            return Err(GeneticError::InvalidChromosome(format!(
                "Expected {} gene values, got {}",
                if fixed {
                    max.to_string()
                } else {
                    format!("1..={}", max)
                },
                values.len()
            )));
        }

        let mut codes = Vec::with_capacity(values.len());
        match &self.spec {
            GenomeSpec::Bit { .. } => {
                for (position, value) in values.iter().enumerate() {
                    match value {
                        GeneValue::Bit(b) => codes.push(*b as u64),
                        other => {
                            return Err(GeneticError::InvalidChromosome(format!(
                                "Position {}: expected a bit, got {:?}",
                                position, other
                            )))
                        }
                    }
                }
            }
            GenomeSpec::List { alphabets } => {
                for (position, value) in values.iter().enumerate() {
                    let GeneValue::Symbol(symbol) = value else {
                        return Err(GeneticError::InvalidChromosome(format!(
                            "Position {}: expected an alphabet symbol, got {:?}",
                            position, value
                        )));
                    };
                    let Some(code) = alphabets[position].iter().position(|s| s == symbol) else {
                        return Err(GeneticError::InvalidChromosome(format!(
                            "Position {}: symbol {:?} is not in the position's alphabet",
                            position, symbol
                        )));
                    };
                    codes.push(code as u64);
                }
            }
            GenomeSpec::Range { bounds } => {
                for (position, value) in values.iter().enumerate() {
                    let GeneValue::Int(g) = value else {
                        return Err(GeneticError::InvalidChromosome(format!(
                            "Position {}: expected an integer, got {:?}",
                            position, value
                        )));
                    };
                    let (lo, hi) = bounds[position];
                    if *g < lo || *g > hi {
                        return Err(GeneticError::InvalidChromosome(format!(
                            "Position {}: {} is outside [{}, {}]",
                            position, g, lo, hi
                        )));
                    }
                    codes.push(g.abs_diff(lo));
                }
            }
            GenomeSpec::Combination { alphabet } => {
                for (position, value) in values.iter().enumerate() {
                    let GeneValue::Symbol(symbol) = value else {
                        return Err(GeneticError::InvalidChromosome(format!(
                            "Position {}: expected an alphabet symbol, got {:?}",
                            position, value
                        )));
                    };
                    let Some(code) = alphabet.iter().position(|s| s == symbol) else {
                        return Err(GeneticError::InvalidChromosome(format!(
                            "Position {}: symbol {:?} is not in the alphabet",
                            position, symbol
                        )));
                    };
                    codes.push(code as u64);
                }
            }
        }

        let chromosome = self.chromosome_from_codes(&codes, 0);
        self.validate(&chromosome)?;
        Ok(chromosome)
    }

    /// Decodes a chromosome into per-position values; holes decode to `None`.
    pub fn decode(&self, chromosome: &Chromosome) -> Vec<Option<GeneValue>> {
        (0..chromosome.len())
            .map(|position| {
                chromosome
                    .get(position)
                    .map(|code| self.value_at(position, code))
            })
            .collect()
    }

    /// Decodes only the defined genes, skipping holes.
    pub fn decode_defined(&self, chromosome: &Chromosome) -> Vec<GeneValue> {
        let holes = chromosome.holes();
        (holes..chromosome.len())
            .filter_map(|position| {
                chromosome
                    .get(position)
                    .map(|code| self.value_at(position, code))
            })
            .collect()
    }

    /// Renders the chromosome as gene tokens joined with `___`; holes render
    /// as a single space.
    pub fn as_string(&self, chromosome: &Chromosome) -> String {
        self.decode(chromosome)
            .iter()
            .map(|value| match value {
                None => HOLE_TOKEN.to_string(),
                Some(v) => token(v),
            })
            .collect::<Vec<_>>()
            .join(TOKEN_SEPARATOR)
    }

    /// Renders only the defined genes, holes omitted.
    pub fn as_string_defined(&self, chromosome: &Chromosome) -> String {
        self.decode_defined(chromosome)
            .iter()
            .map(token)
            .collect::<Vec<_>>()
            .join(TOKEN_SEPARATOR)
    }

    /// Checks a chromosome against all invariants of this genome.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InvalidChromosome` for a length, hole-prefix,
    /// storage-kind, domain, or permutation violation.
    pub fn validate(&self, chromosome: &Chromosome) -> Result<()> {
        let max = self.max_length();
        if chromosome.defined_len() == 0 {
            return Err(GeneticError::InvalidChromosome(
                "Chromosome has no defined genes".to_string(),
            ));
        }
        if chromosome.len() > max {
            return Err(GeneticError::InvalidChromosome(format!(
                "Chromosome length {} exceeds the genome length {}",
                chromosome.len(),
                max
            )));
        }
        match self.variable_length {
            VariableLength::Fixed => {
                if chromosome.len() != max || chromosome.holes() != 0 {
                    return Err(GeneticError::InvalidChromosome(format!(
                        "Fixed-length genome requires exactly {} genes and no holes",
                        max
                    )));
                }
            }
            VariableLength::RightEdge => {
                if chromosome.holes() != 0 {
                    return Err(GeneticError::InvalidChromosome(
                        "Right-edge variable length does not admit a hole prefix".to_string(),
                    ));
                }
            }
            VariableLength::BothEdges => {}
        }

        for position in chromosome.holes()..chromosome.len() {
            let Some(code) = chromosome.get(position) else {
                return Err(GeneticError::InvalidChromosome(format!(
                    "Hole at position {} after the hole prefix",
                    position
                )));
            };
            if code >= self.domain_card(position) {
                return Err(GeneticError::InvalidChromosome(format!(
                    "Code {} at position {} is outside the position's domain",
                    code, position
                )));
            }
        }

        if self.is_combination() {
            let mut seen = vec![false; max];
            for position in 0..chromosome.len() {
                if let Some(code) = chromosome.get(position) {
                    if seen[code as usize] {
                        return Err(GeneticError::InvalidChromosome(format!(
                            "Duplicate symbol at position {}: not a permutation",
                            position
                        )));
                    }
                    seen[code as usize] = true;
                }
            }
        }

        Ok(())
    }

    fn value_at(&self, position: usize, code: u64) -> GeneValue {
        match &self.spec {
            GenomeSpec::Bit { .. } => GeneValue::Bit(code == 1),
            GenomeSpec::List { alphabets } => {
                GeneValue::Symbol(alphabets[position][code as usize].clone())
            }
            GenomeSpec::Range { bounds } => GeneValue::Int(bounds[position].0 + code as i64),
            GenomeSpec::Combination { alphabet } => {
                GeneValue::Symbol(alphabet[code as usize].clone())
            }
        }
    }
}

fn token(value: &GeneValue) -> String {
    match value {
        GeneValue::Bit(b) => if *b { "1" } else { "0" }.to_string(),
        GeneValue::Symbol(s) => s.clone(),
        GeneValue::Int(i) => i.to_string(),
    }
}

fn width_for(cardinality: u64) -> Result<GeneWidth> {
    if cardinality <= u8::MAX as u64 + 1 {
        Ok(GeneWidth::U8)
    } else if cardinality <= u16::MAX as u64 + 1 {
        Ok(GeneWidth::U16)
    } else if cardinality <= u32::MAX as u64 + 1 {
        Ok(GeneWidth::U32)
    } else {
        Err(GeneticError::Configuration(format!(
            "Gene domain cardinality {} exceeds 32-bit storage",
            cardinality
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_genome() -> Genome {
        Genome::new(
            GenomeSpec::List {
                alphabets: vec![
                    vec!["red".into(), "green".into(), "blue".into()],
                    vec!["on".into(), "off".into()],
                ],
            },
            VariableLength::Fixed,
        )
        .unwrap()
    }

    #[test]
    fn test_bit_encode_decode_roundtrip() {
        let genome = Genome::new(GenomeSpec::Bit { length: 6 }, VariableLength::Fixed).unwrap();
        let values: Vec<GeneValue> = [true, false, true, true, false, false]
            .into_iter()
            .map(GeneValue::from)
            .collect();

        let chromosome = genome.encode(&values).unwrap();
        let decoded = genome.decode_defined(&chromosome);
        assert_eq!(decoded, values);

        let reencoded = genome.encode(&decoded).unwrap();
        assert_eq!(chromosome, reencoded);
    }

    #[test]
    fn test_list_encode_rejects_unknown_symbol() {
        let genome = list_genome();
        let result = genome.encode(&["red".into(), "dim".into()]);
        assert!(matches!(result, Err(GeneticError::InvalidChromosome(_))));
    }

    #[test]
    fn test_range_encode_decode_with_negative_bounds() {
        let genome = Genome::new(
            GenomeSpec::Range {
                bounds: vec![(-4, 4); 4],
            },
            VariableLength::Fixed,
        )
        .unwrap();
        let values: Vec<GeneValue> = [-4i64, 0, 3, 4].into_iter().map(GeneValue::from).collect();

        let chromosome = genome.encode(&values).unwrap();
        assert_eq!(genome.decode_defined(&chromosome), values);
    }

    #[test]
    fn test_range_encode_rejects_out_of_bounds() {
        let genome = Genome::new(
            GenomeSpec::Range {
                bounds: vec![(0, 9); 3],
            },
            VariableLength::Fixed,
        )
        .unwrap();
        let result = genome.encode(&[1i64.into(), 10i64.into(), 2i64.into()]);
        assert!(matches!(result, Err(GeneticError::InvalidChromosome(_))));
    }

    #[test]
    fn test_combination_random_is_a_permutation() {
        let genome = Genome::new(
            GenomeSpec::Combination {
                alphabet: (0..20).map(|i| format!("city{}", i)).collect(),
            },
            VariableLength::Fixed,
        )
        .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(5);

        for _ in 0..20 {
            let chromosome = genome.random(&mut rng);
            genome.validate(&chromosome).unwrap();
        }
    }

    #[test]
    fn test_combination_rejects_variable_length() {
        let result = Genome::new(
            GenomeSpec::Combination {
                alphabet: vec!["a".into(), "b".into()],
            },
            VariableLength::RightEdge,
        );
        assert!(matches!(result, Err(GeneticError::Configuration(_))));
    }

    #[test]
    fn test_validate_flags_duplicate_permutation_symbols() {
        let genome = Genome::new(
            GenomeSpec::Combination {
                alphabet: vec!["a".into(), "b".into(), "c".into()],
            },
            VariableLength::Fixed,
        )
        .unwrap();
        let broken = genome.chromosome_from_codes(&[0, 1, 1], 0);
        assert!(matches!(
            genome.validate(&broken),
            Err(GeneticError::InvalidChromosome(_))
        ));
    }

    #[test]
    fn test_as_string_renders_holes_and_separator() {
        let genome = Genome::new(GenomeSpec::Bit { length: 5 }, VariableLength::BothEdges).unwrap();
        let chromosome = genome.chromosome_from_codes(&[1, 0, 1], 2);

        assert_eq!(genome.as_string(&chromosome), " ___ ___1___0___1");
        assert_eq!(genome.as_string_defined(&chromosome), "1___0___1");
    }

    #[test]
    fn test_variable_length_random_respects_bounds() {
        let genome = Genome::new(GenomeSpec::Bit { length: 10 }, VariableLength::BothEdges).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(9);

        for _ in 0..50 {
            let chromosome = genome.random(&mut rng);
            assert!(chromosome.defined_len() >= 1);
            assert!(chromosome.len() <= 10);
            genome.validate(&chromosome).unwrap();
        }
    }
}
