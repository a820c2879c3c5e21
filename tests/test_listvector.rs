use evogen::{Chromosome, GeneValue, GenomeSpec, GeneticEngine, GeneticOptions};

fn alphabets() -> Vec<Vec<String>> {
    vec![
        vec!["red".into(), "green".into(), "blue".into()],
        vec!["S".into(), "M".into(), "L".into(), "XL".into()],
        vec!["on".into(), "off".into()],
        vec!["mon".into(), "tue".into(), "wed".into(), "thu".into(), "fri".into()],
    ]
}

/// Rewards matches against a fixed target assignment, by raw alphabet
/// index: ["blue", "M", "off", "fri"].
fn target_matches(c: &Chromosome) -> f64 {
    let target = [2u64, 1, 1, 4];
    (0..c.len())
        .filter(|&i| c.get(i) == Some(target[i]))
        .count() as f64
}

fn list_engine(seed: u64) -> GeneticEngine<fn(&Chromosome) -> f64> {
    let options = GeneticOptions::builder()
        .population(80)
        .mutation_probability(0.05)
        .preserve(2)
        .build()
        .unwrap();
    let mut engine = GeneticEngine::new(options, target_matches as fn(&Chromosome) -> f64)
        .unwrap()
        .with_seed(seed);
    engine
        .init(GenomeSpec::List {
            alphabets: alphabets(),
        })
        .unwrap();
    engine
}

#[test]
fn test_evolution_finds_the_target_assignment() {
    let mut engine = list_engine(42);
    engine.set_terminate(|stats| stats.max >= 4.0);
    engine.evolve(200).unwrap();

    let best = engine.fittest(1, false).unwrap().remove(0);
    assert_eq!(engine.as_value(&best).unwrap(), 4.0);
    assert_eq!(engine.as_string(&best).unwrap(), "blue___M___off___fri");
}

#[test]
fn test_every_gene_is_a_member_of_its_alphabet() {
    let mut engine = list_engine(43);
    engine.evolve(25).unwrap();

    let alphabets = alphabets();
    for chromosome in engine.population().unwrap().chromosomes() {
        let decoded = engine.as_array_def_only(chromosome).unwrap();
        assert_eq!(decoded.len(), 4);
        for (position, value) in decoded.iter().enumerate() {
            let GeneValue::Symbol(symbol) = value else {
                panic!("list genome decoded a non-symbol gene");
            };
            assert!(
                alphabets[position].contains(symbol),
                "{:?} is not in the alphabet of position {}",
                symbol,
                position
            );
        }
    }
}

#[test]
fn test_decoded_views_reencode_to_an_equal_chromosome() {
    let mut engine = list_engine(44);
    engine.evolve(5).unwrap();

    let genome = engine.genome().unwrap();
    for chromosome in engine.population().unwrap().chromosomes() {
        let decoded = engine.as_array_def_only(chromosome).unwrap();
        let reencoded = genome.encode(&decoded).unwrap();
        assert_eq!(chromosome, &reencoded);
    }
}

#[test]
fn test_inject_accepts_only_alphabet_members() {
    let mut engine = list_engine(45);

    let valid = vec![vec![
        GeneValue::from("red"),
        GeneValue::from("S"),
        GeneValue::from("on"),
        GeneValue::from("mon"),
    ]];
    assert!(engine.inject(&valid).is_ok());

    let invalid = vec![vec![
        GeneValue::from("red"),
        GeneValue::from("S"),
        GeneValue::from("dimmed"),
        GeneValue::from("mon"),
    ]];
    assert!(engine.inject(&invalid).is_err());
}
