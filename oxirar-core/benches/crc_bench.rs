//! Performance benchmarks for CRC implementations
//!
//! This benchmark suite evaluates:
//! - CRC-16 and CRC-32 throughput across different data sizes
//! - Incremental vs single-shot CRC calculation

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxirar_core::crc::{Crc16, Crc32};
use std::hint::black_box;

/// Generate reproducible pseudo-random test data
fn random_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 0x123456789ABCDEF0;
    for _ in 0..size {
        // Linear congruential generator
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

fn bench_crc32_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc32");
    for size in [64usize, 1024, 65536] {
        let data = random_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| Crc32::compute(black_box(data)));
        });
    }
    group.finish();
}

fn bench_crc16_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc16");
    for size in [64usize, 1024, 65536] {
        let data = random_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| Crc16::compute(black_box(data)));
        });
    }
    group.finish();
}

fn bench_crc32_incremental(c: &mut Criterion) {
    let data = random_data(65536);
    c.bench_function("crc32/incremental_4k_chunks", |b| {
        b.iter(|| {
            let mut crc = Crc32::new();
            for chunk in black_box(&data).chunks(4096) {
                crc.update(chunk);
            }
            crc.finalize()
        });
    });
}

criterion_group!(
    benches,
    bench_crc32_sizes,
    bench_crc16_sizes,
    bench_crc32_incremental
);
criterion_main!(benches);
