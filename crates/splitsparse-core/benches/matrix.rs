//! Benchmarks for split sparse matrix assembly and products.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use num_complex::Complex64 as C64;
use splitsparse_core::{RowMajor, RowSym, SplitSparseMatrix};

/// Banded complex system: real diagonal, imaginary first off-diagonal.
fn band_triplets(size: usize) -> Vec<(usize, usize, C64)> {
    let mut triplets = Vec::new();
    for i in 0..size {
        triplets.push((i, i, C64::new(4.0, 0.0)));
        for &offset in &[1_usize, 2] {
            if i + offset < size {
                let v = C64::new(0.0, -1.0 / offset as f64);
                triplets.push((i, i + offset, v));
                triplets.push((i + offset, i, v));
            }
        }
    }
    triplets
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_interaction");

    for size in [100, 1000, 5000] {
        let triplets = band_triplets(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut m = SplitSparseMatrix::<f64, RowMajor>::with_shape(size, size).unwrap();
                for &(i, j, v) in &triplets {
                    m.add_interaction(i, j, v).unwrap();
                }
                black_box(m)
            });
        });
    }

    group.finish();
}

fn bench_from_triplets(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_triplets");

    for size in [100, 1000, 5000] {
        let triplets = band_triplets(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, &size| {
            bencher.iter(|| {
                SplitSparseMatrix::<f64, RowMajor>::from_triplets(size, size, black_box(&triplets))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_matvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("mlt");

    for size in [100, 1000, 10000] {
        let triplets = band_triplets(size);
        let general =
            SplitSparseMatrix::<f64, RowMajor>::from_triplets(size, size, &triplets).unwrap();
        let symmetric =
            SplitSparseMatrix::<f64, RowSym>::from_triplets(size, size, &triplets).unwrap();
        let x: Vec<C64> = (0..size).map(|i| C64::new(1.0, i as f64 * 1e-3)).collect();
        let mut y = vec![C64::default(); size];

        group.bench_with_input(BenchmarkId::new("general", size), &size, |bencher, _| {
            bencher.iter(|| general.mlt(black_box(&x), &mut y).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("symmetric", size), &size, |bencher, _| {
            bencher.iter(|| symmetric.mlt(black_box(&x), &mut y).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assembly, bench_from_triplets, bench_matvec);
criterion_main!(benches);
