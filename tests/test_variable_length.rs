use evogen::{
    Chromosome, GeneValue, GenomeSpec, GeneticEngine, GeneticOptions, VariableLength,
};

fn popcount(c: &Chromosome) -> f64 {
    (0..c.len()).filter(|&i| c.get(i) == Some(1)).count() as f64
}

fn engine_for(level: VariableLength, seed: u64) -> GeneticEngine<fn(&Chromosome) -> f64> {
    let options = GeneticOptions::builder()
        .population(100)
        .variable_length(level)
        .mutation_probability(0.05)
        .preserve(2)
        .build()
        .unwrap();
    let mut engine = GeneticEngine::new(options, popcount as fn(&Chromosome) -> f64)
        .unwrap()
        .with_seed(seed);
    engine.init(GenomeSpec::Bit { length: 10 }).unwrap();
    engine
}

#[test]
fn test_level_two_keeps_all_holes_in_front() {
    let mut engine = engine_for(VariableLength::BothEdges, 42);
    engine.evolve(100).unwrap();

    for chromosome in engine.population().unwrap().chromosomes() {
        let decoded = engine.as_array(chromosome).unwrap();
        // Once a defined gene appears, no hole may follow.
        let mut seen_defined = false;
        for value in &decoded {
            match value {
                Some(_) => seen_defined = true,
                None => assert!(
                    !seen_defined,
                    "hole after a defined gene in {:?}",
                    decoded
                ),
            }
        }
        assert!(chromosome.defined_len() >= 1);
        assert!(chromosome.len() <= 10);
    }
}

#[test]
fn test_level_one_never_grows_a_hole_prefix() {
    let mut engine = engine_for(VariableLength::RightEdge, 43);
    engine.evolve(100).unwrap();

    for chromosome in engine.population().unwrap().chromosomes() {
        assert_eq!(chromosome.holes(), 0);
        assert!(chromosome.defined_len() >= 1);
        assert!(chromosome.len() <= 10);
    }
}

#[test]
fn test_lengths_actually_vary_across_the_population() {
    let engine = engine_for(VariableLength::BothEdges, 44);

    let lengths: std::collections::HashSet<usize> = engine
        .population()
        .unwrap()
        .chromosomes()
        .iter()
        .map(|c| c.defined_len())
        .collect();
    assert!(lengths.len() > 1, "initial lengths should be spread");
}

#[test]
fn test_def_only_views_skip_holes() {
    let mut engine = engine_for(VariableLength::BothEdges, 45);
    engine.evolve(50).unwrap();

    for chromosome in engine.population().unwrap().chromosomes() {
        let full = engine.as_array(chromosome).unwrap();
        let defined = engine.as_array_def_only(chromosome).unwrap();

        assert_eq!(full.len(), chromosome.len());
        assert_eq!(defined.len(), chromosome.defined_len());
        let flattened: Vec<GeneValue> = full.into_iter().flatten().collect();
        assert_eq!(flattened, defined);

        let rendered = engine.as_string_def_only(chromosome).unwrap();
        assert!(!rendered.contains(' '));
    }
}
