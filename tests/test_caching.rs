use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use evogen::{Chromosome, GenomeSpec, GeneticEngine, GeneticOptions};

/// A deterministic challenge that records every chromosome it is asked to
/// score, so tests can compare the call count against the number of
/// distinct chromosomes seen.
#[derive(Clone)]
struct RecordingChallenge {
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<HashSet<u64>>>,
}

impl RecordingChallenge {
    fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn distinct(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl evogen::Challenge for RecordingChallenge {
    fn score(&self, chromosome: &Chromosome) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().insert(chromosome.fingerprint());
        (0..chromosome.len())
            .filter(|&i| chromosome.get(i) == Some(1))
            .count() as f64
    }
}

#[test]
fn test_cache_calls_once_per_distinct_chromosome() {
    let challenge = RecordingChallenge::new();
    let probe = challenge.clone();

    let options = GeneticOptions::builder()
        .population(50)
        .cache(true)
        .preserve(2)
        .build()
        .unwrap();
    let mut engine = GeneticEngine::new(options, challenge).unwrap().with_seed(42);
    // A small search space forces plenty of repeats.
    engine.init(GenomeSpec::Bit { length: 8 }).unwrap();
    engine.evolve(30).unwrap();

    assert_eq!(
        probe.calls(),
        probe.distinct(),
        "every distinct chromosome must be scored exactly once"
    );
    assert_eq!(engine.evaluations(), probe.calls() as u64);
}

#[test]
fn test_without_cache_repeats_are_recomputed() {
    let challenge = RecordingChallenge::new();
    let probe = challenge.clone();

    let options = GeneticOptions::builder()
        .population(50)
        .cache(false)
        .preserve(2)
        .build()
        .unwrap();
    let mut engine = GeneticEngine::new(options, challenge).unwrap().with_seed(42);
    engine.init(GenomeSpec::Bit { length: 8 }).unwrap();
    engine.evolve(30).unwrap();

    // 2^8 possible chromosomes and thousands of evaluations: without the
    // cache the challenge necessarily sees repeats.
    assert!(probe.calls() > probe.distinct());
}

#[test]
fn test_cached_scores_survive_across_generations() {
    let challenge = RecordingChallenge::new();
    let probe = challenge.clone();

    let options = GeneticOptions::builder()
        .population(20)
        .cache(true)
        .preserve(10)
        .crossover_probability(0.0)
        .mutation_probability(0.0)
        .build()
        .unwrap();
    let mut engine = GeneticEngine::new(options, challenge).unwrap().with_seed(1);
    engine.init(GenomeSpec::Bit { length: 8 }).unwrap();

    engine.evolve(1).unwrap();
    let after_first = probe.calls();
    // With crossover and mutation off, every child is a copy of a parent
    // scored in an earlier generation; the cache answers all of them.
    engine.evolve(5).unwrap();
    assert_eq!(probe.calls(), after_first);
}
