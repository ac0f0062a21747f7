//! Performance benchmarks for multidigest
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use multidigest::config::{DigestAlgorithm, SessionConfig};
use multidigest::core::HashSession;
use multidigest::hash::{hash_bytes, DigestAccumulator};
use multidigest::progress::NullObserver;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test file of the specified size
fn create_test_file(dir: &std::path::Path, name: &str, size: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();

    let chunk_size = 64 * 1024;
    let chunk: Vec<u8> = (0..chunk_size).map(|i| (i % 256) as u8).collect();
    let mut remaining = size;

    while remaining > 0 {
        let to_write = remaining.min(chunk_size);
        file.write_all(&chunk[..to_write]).unwrap();
        remaining -= to_write;
    }

    path
}

fn bench_single_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_algorithm");

    let data_size = 10 * 1024 * 1024; // 10 MB
    let data: Vec<u8> = (0..data_size).map(|i| (i % 256) as u8).collect();

    group.throughput(Throughput::Bytes(data_size as u64));

    for algo in [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Blake3,
        DigestAlgorithm::XXHash3,
    ] {
        group.bench_with_input(BenchmarkId::new("hash", algo.name()), &data, |b, data| {
            b.iter(|| black_box(hash_bytes(data, &[algo])));
        });
    }

    group.finish();
}

fn bench_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_set_by_block_size");

    let data_size = 8 * 1024 * 1024;
    let data: Vec<u8> = (0..data_size).map(|i| (i * 31 % 256) as u8).collect();
    let algorithms = DigestAlgorithm::defaults();

    group.throughput(Throughput::Bytes(data_size as u64));

    for block_size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        group.bench_with_input(
            BenchmarkId::new("ingest", humansize::format_size(block_size as u64, humansize::BINARY)),
            &block_size,
            |b, &block_size| {
                b.iter(|| {
                    let mut acc = DigestAccumulator::new(&algorithms);
                    for block in data.chunks(block_size) {
                        acc.ingest(block);
                    }
                    black_box(acc.finalize())
                });
            },
        );
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();

    let files: Vec<_> = (0..100)
        .map(|i| create_test_file(dir.path(), &format!("file_{}.bin", i), 64 * 1024))
        .collect();

    let mut group = c.benchmark_group("session_100_files");
    group.throughput(Throughput::Bytes(100 * 64 * 1024));

    for threads in [1, 4, 8] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| {
                let config = SessionConfig {
                    threads,
                    ..SessionConfig::for_files(files.clone())
                };
                let mut session = HashSession::new(config)
                    .unwrap()
                    .with_observer(Arc::new(NullObserver));
                session.run().unwrap();
                black_box(session.report().unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_algorithms, bench_block_sizes, bench_session);

criterion_main!(benches);
