use adaptfir::{
    autocorr, estimate, fir_filter, lms, solve_wiener, toeplitz, AdaptiveOutput, Bias,
    DesignMatrix, FirFilter, LmsFilter,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

// Windowed correlation cost grows with N · max_lag
fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation");

    let x = noise(4096, 1);
    let y = noise(4096, 2);

    for max_lag in [8, 32, 128].iter() {
        group.throughput(Throughput::Elements((2 * max_lag + 1) as u64));
        group.bench_with_input(
            BenchmarkId::new("autocorr_4096", max_lag),
            max_lag,
            |b, &max_lag| {
                b.iter(|| black_box(autocorr(black_box(&x), max_lag, Bias::Biased)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("xcorr_4096", max_lag),
            max_lag,
            |b, &max_lag| {
                b.iter(|| {
                    black_box(estimate(
                        black_box(&x),
                        Some(black_box(&y)),
                        max_lag,
                        Bias::Unbiased,
                    ))
                });
            },
        );
    }

    group.finish();
}

fn bench_toeplitz(c: &mut Criterion) {
    let mut group = c.benchmark_group("toeplitz");

    let seq = noise(65, 3);
    group.bench_function("toeplitz_64", |b| {
        b.iter(|| black_box(toeplitz(black_box(&seq), 64)));
    });

    let x = noise(4096, 4);
    group.bench_function("design_matrix_4096x32", |b| {
        b.iter(|| black_box(DesignMatrix::new(black_box(&x), 32)));
    });

    group.finish();
}

// Jacobi solve dominates for larger orders
fn bench_wiener(c: &mut Criterion) {
    let mut group = c.benchmark_group("wiener");

    let x = noise(4096, 5);
    let d = fir_filter(&[0.5, -0.3, 0.2, 0.1], &x).unwrap();

    for order in [4, 16, 32].iter() {
        group.bench_with_input(BenchmarkId::new("solve_4096", order), order, |b, &order| {
            b.iter(|| black_box(solve_wiener(black_box(&x), black_box(&d), order)));
        });
    }

    group.finish();
}

fn bench_lms_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("lms_run");

    let x = noise(4096, 6);
    let d = fir_filter(&[0.5, -0.3, 0.2, 0.1], &x).unwrap();
    group.throughput(Throughput::Elements(x.len() as u64));

    for order in [7, 31].iter() {
        group.bench_with_input(BenchmarkId::new("lms_4096", order), order, |b, &order| {
            b.iter(|| black_box(lms(black_box(&x), black_box(&d), order, 0.01, false, None)));
        });
        group.bench_with_input(BenchmarkId::new("nlms_4096", order), order, |b, &order| {
            b.iter(|| black_box(lms(black_box(&x), black_box(&d), order, 0.5, true, None)));
        });
    }

    group.finish();
}

// Streaming LMS - per-sample latency for common tap counts
fn bench_lms_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("lms_filter");

    for taps in [32, 64, 128].iter() {
        let mut lms = LmsFilter::new(*taps, 0.01).unwrap();
        group.bench_function(format!("lms_{}_taps", taps), |b| {
            b.iter(|| black_box(lms.process_sample(black_box(1.0), black_box(0.5))));
        });
    }

    // Prediction mode (no adaptation)
    {
        let mut lms = LmsFilter::new(32, 0.01).unwrap();
        group.bench_function("lms_32_predict_only", |b| {
            b.iter(|| black_box(lms.predict(black_box(1.0))));
        });
    }

    // NLMS adds the input energy per sample
    {
        let mut nlms = LmsFilter::normalized(32, 0.5, 1e-3).unwrap();
        group.bench_function("nlms_32_taps", |b| {
            b.iter(|| black_box(nlms.process_sample(black_box(1.0), black_box(0.5))));
        });
    }

    // Block processing (256 samples, 32 taps)
    {
        let mut lms = LmsFilter::new(32, 0.01).unwrap();
        group.bench_function("lms_32_block_256", |b| {
            let input = [1.0; 256];
            let desired = [0.5; 256];
            let mut output = [AdaptiveOutput {
                output: 0.0,
                error: 0.0,
            }; 256];
            b.iter(|| {
                lms.process_block(
                    black_box(&input),
                    black_box(&desired),
                    black_box(&mut output),
                )
                .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_fir_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("fir_filter");

    let mut filter = FirFilter::new(vec![1.0 / 32.0; 32]).unwrap();
    group.bench_function("single_sample_32_taps", |b| {
        b.iter(|| black_box(filter.process_sample(black_box(1.0))));
    });

    group.bench_function("block_256_samples_32_taps", |b| {
        let mut samples = [0.5; 256];
        b.iter(|| {
            filter.process_block(black_box(&mut samples));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_correlation,
    bench_toeplitz,
    bench_wiener,
    bench_lms_run,
    bench_lms_filter,
    bench_fir_filter
);
criterion_main!(benches);
