use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use evogen::evaluation::FitnessEvaluator;
use evogen::population::Population;
use evogen::rng::RandomNumberGenerator;
use evogen::{Chromosome, GenomeSpec, Genome, GeneticEngine, GeneticOptions, VariableLength};

fn popcount(c: &Chromosome) -> f64 {
    (0..c.len()).filter(|&i| c.get(i) == Some(1)).count() as f64
}

fn build_population(genome: &Genome, size: usize) -> Population {
    let mut rng = RandomNumberGenerator::from_seed(42);
    let mut population = Population::with_capacity(size);
    for _ in 0..size {
        population.push(genome.random(&mut rng));
    }
    population
}

fn bench_fitness_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness_evaluation");
    let genome = Genome::new(GenomeSpec::Bit { length: 92 }, VariableLength::Fixed).unwrap();

    for size in [100, 1000, 10000].iter() {
        let population = build_population(&genome, *size);

        group.bench_with_input(
            BenchmarkId::new("sequential", size),
            &population,
            |b, population| {
                let mut evaluator =
                    FitnessEvaluator::new(popcount as fn(&Chromosome) -> f64, false, false, 1)
                        .unwrap();
                b.iter(|| {
                    let mut population = black_box(population.clone());
                    evaluator.evaluate_population(&mut population).unwrap();
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", size),
            &population,
            |b, population| {
                let mut evaluator =
                    FitnessEvaluator::new(popcount as fn(&Chromosome) -> f64, false, false, 4)
                        .unwrap();
                b.iter(|| {
                    let mut population = black_box(population.clone());
                    evaluator.evaluate_population(&mut population).unwrap();
                })
            },
        );
    }

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let genome = Genome::new(GenomeSpec::Bit { length: 92 }, VariableLength::Fixed).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(42);
    let chromosome = genome.random(&mut rng);

    group.bench_function("decode_92_bits", |b| {
        b.iter(|| genome.decode(black_box(&chromosome)))
    });

    let decoded = genome.decode_defined(&chromosome);
    group.bench_function("encode_92_bits", |b| {
        b.iter(|| genome.encode(black_box(&decoded)).unwrap())
    });

    group.bench_function("fingerprint_92_bits", |b| {
        b.iter(|| black_box(&chromosome).fingerprint())
    });

    group.finish();
}

fn bench_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");
    group.sample_size(10);

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("ten_generations", size), size, |b, &size| {
            b.iter(|| {
                let options = GeneticOptions::builder()
                    .population(size)
                    .preserve(2)
                    .build()
                    .unwrap();
                let mut engine =
                    GeneticEngine::new(options, popcount as fn(&Chromosome) -> f64)
                        .unwrap()
                        .with_seed(42);
                engine.init(GenomeSpec::Bit { length: 92 }).unwrap();
                engine.evolve(black_box(10)).unwrap();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fitness_evaluation, bench_codec, bench_evolution);
criterion_main!(benches);
